use enumflags2::{BitFlags, bitflags};

use crate::error::Error;

/// 映射区的访问权限
///
/// 空集合表示不可访问的占位映射
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectFlag {
    R = 0b0000_0001,
    W = 0b0000_0010,
}

/// 映射方式
#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFlag {
    /// 不以文件为后备
    Anonymous = 0b0000_0001,
    /// 写时复制，不与其他进程共享
    Private = 0b0000_0010,
}

/// 一次映射请求的全部配置
///
/// 默认为可读可写、匿名且私有
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
    pub prot: BitFlags<ProtectFlag>,
    pub flags: BitFlags<MapFlag>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            prot: ProtectFlag::R | ProtectFlag::W,
            flags: MapFlag::Anonymous | MapFlag::Private,
        }
    }
}

impl MapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prot(mut self, prot: impl Into<BitFlags<ProtectFlag>>) -> Self {
        self.prot = prot.into();
        self
    }

    pub fn readable(mut self, readable: bool) -> Self {
        self.prot.set(ProtectFlag::R, readable);
        self
    }

    pub fn writable(mut self, writable: bool) -> Self {
        self.prot.set(ProtectFlag::W, writable);
        self
    }

    /// 不可访问的占位映射
    pub fn no_access(self) -> Self {
        self.prot(BitFlags::empty())
    }

    pub fn flags(mut self, flags: impl Into<BitFlags<MapFlag>>) -> Self {
        self.flags = flags.into();
        self
    }

    /// 只接受匿名且私有的映射
    pub fn validate(&self) -> Result<(), Error> {
        if self.flags == MapFlag::Anonymous | MapFlag::Private {
            Ok(())
        } else {
            Err(Error::UnsupportedFlags(self.flags))
        }
    }

    pub fn allows(&self, prot: impl Into<BitFlags<ProtectFlag>>) -> bool {
        self.prot.contains(prot)
    }
}
