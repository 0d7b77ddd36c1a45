//! anon-mmap 用到的常量

use core::mem;

/// 查询不到系统页大小时使用的页大小
pub const DEFAULT_PAGE_SIZE: usize = 0x1000;

/// 一个槽位的字节数，即机器字长
pub const SLOT_SIZE: usize = mem::size_of::<usize>();

/// 冒烟测试默认申请的槽位数
pub const DEFAULT_SLOTS: usize = 10;
