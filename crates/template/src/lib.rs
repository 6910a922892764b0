//! # Template
//!
//! 模板模块。
//!
//! 负责：
//! - 解析 `fake:{...}` 指令
//! - 将 JSON 模板编译为不可变的 `Template`
//! - 每次迭代物化出一条全新的记录

pub mod directive;
pub mod error;
pub mod materialize;
pub mod node;

pub use directive::{is_ranged, parse_directive, DIRECTIVE_PREFIX, RANGED_GENERATORS};
pub use error::{DirectiveError, FieldError, TemplateError};
pub use materialize::Materializer;
pub use node::{FieldIssue, Template, TemplateNode};
