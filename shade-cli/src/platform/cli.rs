//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示。

use std::error::Error;

/// 将错误及其 source 链格式化为多行文本
pub fn format_error_chain(e: &dyn Error) -> String {
    let mut out = format!("❌ {e}");
    let mut source = e.source();
    while let Some(cause) = source {
        out.push_str(&format!("\n   caused by: {cause}"));
        source = cause.source();
    }
    out
}

/// 打印错误链到 stderr
pub fn print_error_chain(e: &dyn Error) {
    eprintln!("{}", format_error_chain(e));
}
