//! Template compilation
//!
//! Markup elements are compiled once into an immutable [`TemplateTree`]:
//! `for`, `if` and `bind:<key>` attributes become parsed directives, literal
//! style attributes are folded into a static [`Style`](crate::style::Style),
//! and element text becomes a `{{ expr }}` text template.
//!
//! ```text
//! <list flex-direction="row">
//!     <item for="i in items" if="i != 2" bind:width="i * 10 + 'px'">{{ i }}</item>
//! </list>
//! ```

mod compiler;
mod node;
mod text;

pub use compiler::{
    compile, CompiledTemplate, Diagnostic, BIND_PREFIX, FOR_DIRECTIVE, IF_DIRECTIVE,
};
pub use node::{
    BindDirective, ForDirective, IfDirective, TemplateId, TemplateNode, TemplateTree,
    TextTemplate,
};
pub use text::compile_text;
