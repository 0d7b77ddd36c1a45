use core::ptr::NonNull;
use core::slice;

use enumflags2::BitFlags;
use log::{debug, warn};

use crate::error::Error;
use crate::options::{MapOptions, ProtectFlag};
use crate::page;
use crate::sys::{sys_mmap, sys_munmap};

/// 映射区的生命周期，只能从 Mapped 走向 Released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    Mapped,
    Released,
}

/// 一段匿名、私有的映射区，由持有者独占
///
/// 析构时若尚未释放，则自动归还给内核。
/// 可以整体转移到别的线程，但不能跨线程共享。
#[derive(Debug)]
pub struct MappedRegion {
    start: NonNull<u8>,
    /// 申请时的长度，解除映射时原样交还
    len: usize,
    options: MapOptions,
    state: RegionState,
}

// SAFETY: 映射区只属于持有者，转移所有权不会产生别名
unsafe impl Send for MappedRegion {}

impl MappedRegion {
    /// 以默认配置(可读可写)映射`len`字节
    pub fn new(len: usize) -> Result<Self, Error> {
        Self::acquire(len, MapOptions::default())
    }

    /// 向内核申请至少`len`字节的匿名映射，内容全为零
    pub fn acquire(len: usize, options: MapOptions) -> Result<Self, Error> {
        if len == 0 {
            return Err(Error::ZeroLength);
        }
        options.validate()?;
        let mapped_len = page::page_round_up(len).ok_or(Error::LengthOverflow(len))?;

        let start = sys_mmap(len, options.prot, options.flags)
            .map_err(|errno| Error::from_mmap(len, errno))?;

        debug!(
            "mmap [{:#x}, {:#x}) prot={:?}",
            start.as_ptr() as usize,
            start.as_ptr() as usize + mapped_len,
            options.prot
        );

        Ok(Self {
            start,
            len,
            options,
            state: RegionState::Mapped,
        })
    }

    /// 读取第`index`个字节
    ///
    /// # Panics
    ///
    /// `index`越界时恐慌
    pub fn read(&self, index: usize) -> Result<u8, Error> {
        Ok(self.bytes()?[index])
    }

    /// 原地写入第`index`个字节
    ///
    /// 只需要写权限，不会构造整个映射区的引用
    ///
    /// # Panics
    ///
    /// `index`越界时恐慌
    pub fn write(&mut self, index: usize, value: u8) -> Result<(), Error> {
        self.check(ProtectFlag::W)?;
        assert!(
            index < self.len,
            "index out of range: the len is {} but the index is {index}",
            self.len
        );
        // SAFETY: 区间仍处于映射中，且可写
        unsafe { self.start.as_ptr().add(index).write(value) };
        Ok(())
    }

    /// 整个映射区的只读视图，需要读权限
    pub fn bytes(&self) -> Result<&[u8], Error> {
        self.check(ProtectFlag::R)?;
        // SAFETY: 区间仍处于映射中，内核已清零，借用期间无法释放
        Ok(unsafe { slice::from_raw_parts(self.start.as_ptr(), self.len) })
    }

    /// 整个映射区的可变视图，需要读写权限
    pub fn bytes_mut(&mut self) -> Result<&mut [u8], Error> {
        self.check(ProtectFlag::R | ProtectFlag::W)?;
        // SAFETY: 同上，且`&mut self`保证独占
        Ok(unsafe { slice::from_raw_parts_mut(self.start.as_ptr(), self.len) })
    }

    /// 归还映射区
    ///
    /// 第二次调用会得到 [`Error::Released`]
    pub fn release(&mut self) -> Result<(), Error> {
        if self.state == RegionState::Released {
            return Err(Error::Released);
        }
        // 无论 munmap 成功与否，这段区间都不能再被访问
        self.state = RegionState::Released;

        // SAFETY: 所有视图都借用自`self`，此处已不可能存活
        unsafe { sys_munmap(self.start, self.len) }.map_err(|errno| Error::Unmap { errno })?;

        debug!(
            "munmap [{:#x}, {:#x})",
            self.start.as_ptr() as usize,
            self.start.as_ptr() as usize + self.mapped_len()
        );
        Ok(())
    }

    fn check(&self, required: impl Into<BitFlags<ProtectFlag>>) -> Result<(), Error> {
        if self.state == RegionState::Released {
            return Err(Error::Released);
        }
        let required: BitFlags<ProtectFlag> = required.into();
        let missing = required & !self.options.prot;
        match missing.iter().next() {
            Some(required) => Err(Error::AccessDenied { required }),
            None => Ok(()),
        }
    }

    /// 申请时的字节数
    pub fn len(&self) -> usize {
        self.len
    }

    /// 成功映射的区域永远非空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 内核实际映射的字节数，为页大小的整数倍
    pub fn mapped_len(&self) -> usize {
        page::page_round_up(self.len).unwrap_or(self.len)
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.start.as_ptr()
    }

    pub fn options(&self) -> MapOptions {
        self.options
    }

    pub fn state(&self) -> RegionState {
        self.state
    }

    pub fn is_released(&self) -> bool {
        self.state == RegionState::Released
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        if self.state == RegionState::Mapped {
            if let Err(err) = self.release() {
                warn!("dropping region at {:#x}: {err}", self.start.as_ptr() as usize);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn release_marks_state() {
        let mut region = MappedRegion::new(1).unwrap();
        assert_eq!(RegionState::Mapped, region.state());
        region.release().unwrap();
        assert!(region.is_released());
    }

    #[test]
    fn mapped_len_is_whole_pages() {
        let region = MappedRegion::new(page::page_size() + 1).unwrap();
        assert_eq!(2 * page::page_size(), region.mapped_len());
        assert_eq!(page::page_size() + 1, region.len());
        assert!(!region.is_empty());
    }

    #[test]
    fn check_reports_first_missing_permission() {
        let region = MappedRegion::acquire(8, MapOptions::new().no_access()).unwrap();
        assert_eq!(
            Err(Error::AccessDenied {
                required: ProtectFlag::R
            }),
            region.check(ProtectFlag::R | ProtectFlag::W)
        );
        assert_eq!(ErrorKind::AccessDenied, region.read(0).unwrap_err().kind());
    }
}
