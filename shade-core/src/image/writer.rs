//! 镜像写入

use super::header::{ImageHeader, UnitFlags};
use super::ImageError;

/// 单元镜像构建器
///
/// ```
/// use shade_core::{ImageWriter, UnitImage};
///
/// let bytes = ImageWriter::new("pkg.X").payload(b"body".to_vec()).finish().unwrap();
/// assert_eq!(UnitImage::parse(&bytes).unwrap().name, "pkg.X");
/// ```
#[derive(Debug, Clone)]
pub struct ImageWriter {
    name: String,
    flags: UnitFlags,
    dependencies: Vec<String>,
    payload: Vec<u8>,
}

impl ImageWriter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: UnitFlags::empty(),
            dependencies: Vec::new(),
            payload: Vec::new(),
        }
    }

    pub fn flags(mut self, flags: UnitFlags) -> Self {
        self.flags = flags;
        self
    }

    /// 标记为接口单元
    pub fn interface(mut self, is_interface: bool) -> Self {
        if is_interface {
            self.flags.insert(UnitFlags::IS_INTERFACE);
        } else {
            self.flags.remove(UnitFlags::IS_INTERFACE);
        }
        self
    }

    pub fn dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    pub fn payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// 生成镜像字节
    pub fn finish(self) -> Result<Vec<u8>, ImageError> {
        if self.name.is_empty() {
            return Err(ImageError::EmptyName);
        }
        let dep_count = u16::try_from(self.dependencies.len()).map_err(|_| {
            ImageError::FieldTooLong {
                field: "dependency list",
                len: self.dependencies.len(),
            }
        })?;
        let payload_len = u32::try_from(self.payload.len()).map_err(|_| ImageError::FieldTooLong {
            field: "payload",
            len: self.payload.len(),
        })?;

        let mut out = ImageHeader::new(self.flags).to_bytes().to_vec();
        write_str(&mut out, "unit name", &self.name)?;
        out.extend_from_slice(&dep_count.to_le_bytes());
        for dep in &self.dependencies {
            write_str(&mut out, "dependency name", dep)?;
        }
        out.extend_from_slice(&payload_len.to_le_bytes());
        out.extend_from_slice(&self.payload);
        Ok(out)
    }
}

fn write_str(out: &mut Vec<u8>, field: &'static str, value: &str) -> Result<(), ImageError> {
    let len = u16::try_from(value.len()).map_err(|_| ImageError::FieldTooLong {
        field,
        len: value.len(),
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(value.as_bytes());
    Ok(())
}
