//! 对 mmap/munmap/sysconf 的薄封装
//!
//! 枚举化的选项在这里才被翻译成 libc 的常量，
//! 上层不直接接触裸标志位。

use core::fmt;
use core::ptr::{self, NonNull};
use std::io;

use derive_more::{From, Into};
use enumflags2::BitFlags;

use crate::options::{MapFlag, ProtectFlag};

/// 不映射文件时传给 mmap 的描述符
const NO_FD: libc::c_int = -1;

/// 系统调用失败时的 errno
#[derive(Debug, Clone, Copy, PartialEq, Eq, From, Into)]
pub struct Errno(pub i32);

impl Errno {
    fn last() -> Self {
        Self(
            io::Error::last_os_error()
                .raw_os_error()
                .unwrap_or(libc::EINVAL),
        )
    }

    /// 参数不被内核接受，而非资源不足
    pub fn is_invalid_argument(self) -> bool {
        self.0 == libc::EINVAL
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", io::Error::from_raw_os_error(self.0))
    }
}

fn prot_bits(prot: BitFlags<ProtectFlag>) -> libc::c_int {
    prot.iter().fold(libc::PROT_NONE, |bits, flag| {
        bits | match flag {
            ProtectFlag::R => libc::PROT_READ,
            ProtectFlag::W => libc::PROT_WRITE,
        }
    })
}

fn map_bits(flags: BitFlags<MapFlag>) -> libc::c_int {
    flags.iter().fold(0, |bits, flag| {
        bits | match flag {
            MapFlag::Anonymous => libc::MAP_ANON,
            MapFlag::Private => libc::MAP_PRIVATE,
        }
    })
}

/// 由内核挑选起始地址，映射至少`len`字节
///
/// 结果
/// * Ok(start) => 映射区的起始地址
/// * Err(errno) => 内核拒绝映射
pub fn sys_mmap(
    len: usize,
    prot: BitFlags<ProtectFlag>,
    flags: BitFlags<MapFlag>,
) -> Result<NonNull<u8>, Errno> {
    // SAFETY: 起始地址为空，内核不会覆盖已有映射
    let start = unsafe {
        libc::mmap(
            ptr::null_mut(),
            len,
            prot_bits(prot),
            map_bits(flags),
            NO_FD,
            0,
        )
    };

    if start == libc::MAP_FAILED {
        return Err(Errno::last());
    }

    NonNull::new(start.cast()).ok_or_else(Errno::last)
}

/// 解除`[start, start + len)`的映射
///
/// # Safety
///
/// 调用后该区间内的任何引用都不得再使用
pub unsafe fn sys_munmap(start: NonNull<u8>, len: usize) -> Result<(), Errno> {
    // SAFETY: 由调用者保证区间不再被访问
    match unsafe { libc::munmap(start.as_ptr().cast(), len) } {
        0 => Ok(()),
        _ => Err(Errno::last()),
    }
}

/// 查询系统页大小，失败时返回`None`
pub fn sys_page_size() -> Option<usize> {
    // SAFETY: sysconf 只读取系统配置
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    (size > 0).then_some(size as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prot_translation() {
        assert_eq!(libc::PROT_NONE, prot_bits(BitFlags::empty()));
        assert_eq!(libc::PROT_READ, prot_bits(ProtectFlag::R.into()));
        assert_eq!(
            libc::PROT_READ | libc::PROT_WRITE,
            prot_bits(ProtectFlag::R | ProtectFlag::W)
        );
    }

    #[test]
    fn anonymous_private_translation() {
        assert_eq!(
            libc::MAP_ANON | libc::MAP_PRIVATE,
            map_bits(MapFlag::Anonymous | MapFlag::Private)
        );
    }

    #[test]
    fn errno_display_uses_os_message() {
        let errno = Errno(libc::ENOMEM);
        assert_eq!(
            io::Error::from_raw_os_error(libc::ENOMEM).to_string(),
            errno.to_string()
        );
        assert!(!errno.is_invalid_argument());
        assert!(Errno(libc::EINVAL).is_invalid_argument());
    }
}
