//! 镜像文件头定义
//!
//! 8 字节固定头：Magic、版本、标志位

use super::ImageError;

/// 文件头魔数: "SHDU"
pub const MAGIC: [u8; 4] = [b'S', b'H', b'D', b'U'];

/// 当前格式版本；主版本不同即不兼容
pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 0;

/// 文件头大小: 8 字节
pub const HEADER_SIZE: usize = 8;

/// 单元标志位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitFlags(pub u16);

impl UnitFlags {
    /// 接口单元（应由宿主统一加载，以保证跨加载器的类型一致）
    pub const IS_INTERFACE: u16 = 0x0001;

    /// 创建空的标志
    pub fn empty() -> Self {
        Self(0)
    }

    /// 检查是否包含指定标志
    pub fn contains(&self, flag: u16) -> bool {
        (self.0 & flag) != 0
    }

    /// 添加标志
    pub fn insert(&mut self, flag: u16) {
        self.0 |= flag;
    }

    /// 移除标志
    pub fn remove(&mut self, flag: u16) {
        self.0 &= !flag;
    }
}

/// 文件头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub version_major: u8,
    pub version_minor: u8,
    pub flags: UnitFlags,
}

impl ImageHeader {
    /// 当前版本的文件头
    pub fn new(flags: UnitFlags) -> Self {
        Self {
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
            flags,
        }
    }

    /// 序列化为字节数组
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..4].copy_from_slice(&MAGIC);
        bytes[4] = self.version_major;
        bytes[5] = self.version_minor;
        bytes[6..8].copy_from_slice(&self.flags.0.to_le_bytes());
        bytes
    }

    /// 从字节数组解析并校验 Magic 与主版本
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.len() < HEADER_SIZE {
            return Err(ImageError::Truncated {
                offset: 0,
                needed: HEADER_SIZE,
                available: bytes.len(),
            });
        }
        if bytes[..4] != MAGIC {
            return Err(ImageError::BadMagic {
                found: bytes[..4].to_vec(),
            });
        }

        let header = Self {
            version_major: bytes[4],
            version_minor: bytes[5],
            flags: UnitFlags(u16::from_le_bytes([bytes[6], bytes[7]])),
        };
        if header.version_major != VERSION_MAJOR {
            return Err(ImageError::UnsupportedVersion {
                major: header.version_major,
                minor: header.version_minor,
            });
        }
        Ok(header)
    }
}
