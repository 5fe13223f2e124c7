//! 镜像读取与校验

use super::header::{ImageHeader, UnitFlags, HEADER_SIZE};
use super::writer::ImageWriter;
use super::ImageError;

/// 解析后的单元镜像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitImage {
    pub header: ImageHeader,
    /// 镜像中声明的单元名
    pub name: String,
    /// 依赖的单元名（链接时由宿主解析）
    pub dependencies: Vec<String>,
    pub payload: Vec<u8>,
}

impl UnitImage {
    /// 解析并完整校验镜像字节
    pub fn parse(bytes: &[u8]) -> Result<Self, ImageError> {
        let header = ImageHeader::from_bytes(bytes)?;
        let mut reader = ByteReader::new(bytes, HEADER_SIZE);

        let name = reader.read_str("unit name")?;
        if name.is_empty() {
            return Err(ImageError::EmptyName);
        }

        let dep_count = reader.read_u16()?;
        let mut dependencies = Vec::with_capacity(usize::from(dep_count));
        for _ in 0..dep_count {
            dependencies.push(reader.read_str("dependency name")?);
        }

        let payload_len = reader.read_u32()? as usize;
        let payload = reader.take(payload_len)?.to_vec();

        let remaining = reader.remaining();
        if remaining > 0 {
            return Err(ImageError::TrailingBytes { count: remaining });
        }

        Ok(Self {
            header,
            name,
            dependencies,
            payload,
        })
    }

    pub fn flags(&self) -> UnitFlags {
        self.header.flags
    }

    /// 重新编码为字节
    pub fn to_bytes(&self) -> Result<Vec<u8>, ImageError> {
        let mut writer = ImageWriter::new(&self.name)
            .flags(self.header.flags)
            .payload(self.payload.clone());
        for dep in &self.dependencies {
            writer = writer.dependency(dep);
        }
        writer.finish()
    }
}

/// 带越界检查的顺序读取器
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ImageError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(ImageError::Truncated {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u16(&mut self) -> Result<u16, ImageError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, ImageError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_str(&mut self, field: &'static str) -> Result<String, ImageError> {
        let len = usize::from(self.read_u16()?);
        let raw = self.take(len)?;
        std::str::from_utf8(raw)
            .map(str::to_string)
            .map_err(|_| ImageError::InvalidUtf8 { field })
    }
}
