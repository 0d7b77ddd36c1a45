//! 向操作系统直接申请匿名、进程私有的内存映射。
//!
//! 映射不以任何文件为后备，内容初始化为零，
//! 由 [`MappedRegion`] 独占持有，直至显式释放或被析构。

#[cfg(not(unix))]
compile_error!("anon-mmap relies on the Unix mmap/munmap interface");

pub mod config;
pub mod page;

mod error;
mod options;
mod region;
mod sys;

pub use self::error::{Error, ErrorKind};
pub use self::options::{MapFlag, MapOptions, ProtectFlag};
pub use self::page::{page_count, page_round_up, page_size};
pub use self::region::{MappedRegion, RegionState};
pub use self::sys::Errno;

pub use enumflags2::BitFlags;
