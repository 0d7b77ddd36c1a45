//! 页大小相关的计算
//!
//! 映射长度最终由内核按页上取整，这里只是让调用者提前知道实际占用。

use log::warn;
use spin::Lazy;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::sys;

static PAGE_SIZE: Lazy<usize> = Lazy::new(|| {
    sys::sys_page_size().unwrap_or_else(|| {
        warn!("sysconf(_SC_PAGESIZE) failed, assuming {DEFAULT_PAGE_SIZE:#x}");
        DEFAULT_PAGE_SIZE
    })
});

/// 系统页大小，只查询一次
pub fn page_size() -> usize {
    *PAGE_SIZE
}

/// 将`len`上取整到页大小的整数倍，溢出时返回`None`
pub fn page_round_up(len: usize) -> Option<usize> {
    len.checked_next_multiple_of(page_size())
}

/// 映射`len`字节所占的页数
pub fn page_count(len: usize) -> usize {
    len.div_ceil(page_size())
}
