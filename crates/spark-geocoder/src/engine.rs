//! 地理编码引擎接缝。
//!
//! # 教案定位（Why）
//! - 引擎以两块可变定长缓冲为参数、原地改写、无返回值；它是整个系统中唯一需要逐字节兼容的边界。
//! - 原生库句柄不做进程级单例，而是以 [`GeocodeEngine`] 的值显式注入批处理驱动，测试可替换为
//!   [`FnEngine`] 或 [`DryRunEngine`]。
//!
//! # 契约说明（What）
//! - 实现方必须保证调用返回后两块工作区长度不变（[`WorkArea`] 的可变视图本身不允许改变长度）。
//! - 参数位置固定为 `(WA1, WA2)`；[`check_work_areas`] 在交出裸指针之前校验位置。
//! - 是否需要串行化访问由具体引擎决定：原生引擎的全部句柄共用一把进程级锁。

use std::sync::Arc;

use spark_codec_geosupport::{BufferKind, WorkArea};

use crate::error::EngineError;

/// 地理编码引擎。
pub trait GeocodeEngine: Send + Sync {
    /// 引擎名称，用于日志与错误信息。
    fn name(&self) -> &'static str;

    /// 原地改写两块工作区。
    fn geocode(&self, wa1: &mut WorkArea, wa2: &mut WorkArea) -> Result<(), EngineError>;
}

impl<E: GeocodeEngine + ?Sized> GeocodeEngine for &E {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn geocode(&self, wa1: &mut WorkArea, wa2: &mut WorkArea) -> Result<(), EngineError> {
        (**self).geocode(wa1, wa2)
    }
}

impl<E: GeocodeEngine + ?Sized> GeocodeEngine for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn geocode(&self, wa1: &mut WorkArea, wa2: &mut WorkArea) -> Result<(), EngineError> {
        (**self).geocode(wa1, wa2)
    }
}

impl<E: GeocodeEngine + ?Sized> GeocodeEngine for Arc<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn geocode(&self, wa1: &mut WorkArea, wa2: &mut WorkArea) -> Result<(), EngineError> {
        (**self).geocode(wa1, wa2)
    }
}

/// 校验参数位置：第一个必须是 WA1，第二个必须是 WA2。
pub fn check_work_areas(wa1: &WorkArea, wa2: &WorkArea) -> Result<(), EngineError> {
    for (area, expected) in [
        (wa1, BufferKind::InputOutput),
        (wa2, BufferKind::OutputOnly),
    ] {
        if area.kind() != expected {
            return Err(EngineError::WrongBuffer {
                expected,
                actual: area.kind(),
            });
        }
    }
    Ok(())
}

/// 不改写任何字节的引擎，用于在没有原生库的环境中走通编码、解码与输出链路。
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunEngine;

impl GeocodeEngine for DryRunEngine {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn geocode(&self, wa1: &mut WorkArea, wa2: &mut WorkArea) -> Result<(), EngineError> {
        check_work_areas(wa1, wa2)
    }
}

/// 以闭包实现的引擎，常用于测试夹具与录制回放。
pub struct FnEngine<F> {
    name: &'static str,
    call: F,
}

impl<F> FnEngine<F>
where
    F: Fn(&mut WorkArea, &mut WorkArea) -> Result<(), EngineError> + Send + Sync,
{
    /// 以名称与闭包构造引擎。
    pub fn new(name: &'static str, call: F) -> Self {
        Self { name, call }
    }
}

impl<F> GeocodeEngine for FnEngine<F>
where
    F: Fn(&mut WorkArea, &mut WorkArea) -> Result<(), EngineError> + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn geocode(&self, wa1: &mut WorkArea, wa2: &mut WorkArea) -> Result<(), EngineError> {
        check_work_areas(wa1, wa2)?;
        (self.call)(wa1, wa2)
    }
}

impl<F> std::fmt::Debug for FnEngine<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnEngine").field("name", &self.name).finish()
    }
}

/// 原生库的进程级调用锁，所有 `NativeEngine` 句柄共用；同一时刻最多只有一次原生调用。
#[cfg(any(feature = "native", test))]
static NATIVE_CALL_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

#[cfg(any(feature = "native", test))]
fn native_call_guard() -> parking_lot::MutexGuard<'static, ()> {
    NATIVE_CALL_LOCK.lock()
}

#[cfg(feature = "native")]
pub use native::NativeEngine;

#[cfg(feature = "native")]
mod native {
    use std::os::raw::c_char;

    use spark_codec_geosupport::WorkArea;

    use super::{GeocodeEngine, check_work_areas, native_call_guard};
    use crate::error::EngineError;

    #[cfg_attr(windows, link(name = "NYCGeo"))]
    #[cfg_attr(not(windows), link(name = "geo"))]
    unsafe extern "C" {
        #[cfg_attr(windows, link_name = "NYCgeo")]
        #[cfg_attr(not(windows), link_name = "geo")]
        fn geosupport_call(wa1: *mut c_char, wa2: *mut c_char);
    }

    /// Geosupport 原生库句柄。
    ///
    /// - **Contract**：原生库不可重入且状态为进程级；所有句柄共用同一把进程级锁串行化调用，
    ///   因此构造多个句柄或跨线程共享同一句柄都是安全的，只是不会带来并行度。
    #[derive(Debug, Default, Clone, Copy)]
    pub struct NativeEngine {
        _linked: (),
    }

    impl NativeEngine {
        /// 构造句柄。库在链接期解析，构造本身不做 I/O。
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl GeocodeEngine for NativeEngine {
        fn name(&self) -> &'static str {
            "geosupport-native"
        }

        fn geocode(&self, wa1: &mut WorkArea, wa2: &mut WorkArea) -> Result<(), EngineError> {
            check_work_areas(wa1, wa2)?;
            let _guard = native_call_guard();
            // SAFETY: 两块缓冲长度恰为引擎约定的 1200/4300 字节，且在调用期间被独占借用；
            // 进程级锁保证没有其他线程同时进入原生库。
            unsafe {
                geosupport_call(
                    wa1.as_mut_bytes().as_mut_ptr().cast(),
                    wa2.as_mut_bytes().as_mut_ptr().cast(),
                );
            }
            Ok(())
        }
    }
}

/// 未启用 `native` 特性时的占位说明，供命令行给出可操作的提示。
pub const NATIVE_DISABLED_HINT: &str =
    "当前构建未启用 `native` 特性；请使用 `--features native` 重新构建，或以 `--dry-run` 运行";
