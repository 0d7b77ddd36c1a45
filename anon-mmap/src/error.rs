use derive_more::Display;
use enumflags2::BitFlags;

use crate::options::{MapFlag, ProtectFlag};
use crate::sys::Errno;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Error {
    #[display(fmt = "cannot map an empty region")]
    ZeroLength,

    /// 按页上取整后溢出
    #[display(fmt = "length {} overflows when rounded up to the page size", _0)]
    LengthOverflow(usize),

    #[display(fmt = "mapping must be anonymous and private, got {:?}", _0)]
    UnsupportedFlags(BitFlags<MapFlag>),

    /// 内核认为参数不合法
    #[display(fmt = "mmap of {} bytes rejected: {}", len, errno)]
    Rejected { len: usize, errno: Errno },

    /// 地址空间或内存额度不足
    #[display(fmt = "mmap of {} bytes failed: {}", len, errno)]
    Exhausted { len: usize, errno: Errno },

    #[display(fmt = "region has already been released")]
    Released,

    #[display(fmt = "munmap failed: {}", errno)]
    Unmap { errno: Errno },

    #[display(fmt = "region is not mapped with {:?} permission", required)]
    AccessDenied { required: ProtectFlag },
}

/// 错误的粗粒度分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    ResourceExhausted,
    InvalidState,
    AccessDenied,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            ZeroLength | LengthOverflow(_) | UnsupportedFlags(_) | Rejected { .. } => {
                ErrorKind::InvalidArgument
            }
            Exhausted { .. } => ErrorKind::ResourceExhausted,
            Released | Unmap { .. } => ErrorKind::InvalidState,
            AccessDenied { .. } => ErrorKind::AccessDenied,
        }
    }

    pub(crate) fn from_mmap(len: usize, errno: Errno) -> Self {
        if errno.is_invalid_argument() {
            Self::Rejected { len, errno }
        } else {
            Self::Exhausted { len, errno }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mmap_errno_classification() {
        assert_eq!(
            ErrorKind::ResourceExhausted,
            Error::from_mmap(1, Errno(libc::ENOMEM)).kind()
        );
        assert_eq!(
            ErrorKind::ResourceExhausted,
            Error::from_mmap(1, Errno(libc::EAGAIN)).kind()
        );
        assert_eq!(
            ErrorKind::InvalidArgument,
            Error::from_mmap(1, Errno(libc::EINVAL)).kind()
        );
    }

    #[test]
    fn display() {
        assert_eq!("cannot map an empty region", Error::ZeroLength.to_string());
        assert_eq!(
            "region is not mapped with W permission",
            Error::AccessDenied {
                required: ProtectFlag::W
            }
            .to_string()
        );
    }
}
