//! # Emitter
//!
//! 记录生成主循环。
//!
//! 负责：
//! - 根据 limit 与 sink 类型决定停止策略
//! - 逐条物化、序列化并分发记录
//! - 响应外部取消 (Ctrl+C / SIGTERM / 超时)
//! - 任何退出路径都 flush/close 全部 sinks
//! - 汇总吞吐与每个 sink 的写入统计
//!
//! ## 使用示例
//!
//! ```ignore
//! use emitter::{run_blueprint, RunState};
//!
//! let report = run_blueprint(&blueprint, registry, cancel).await?;
//! assert_eq!(report.outcome, RunState::Completed);
//! ```

mod engine;
mod error;
mod policy;
mod report;
mod state;

pub use engine::{run_blueprint, Emitter, EmitterBuilder, EmitterConfig};
pub use error::EmitterError;
pub use policy::StopPolicy;
pub use report::RunReport;
pub use state::RunState;
