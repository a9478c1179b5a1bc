use colored::*;

use crate::common::api::models::LogEntry;

/// 漂亮的终端输出工具
pub struct PrettyLogger;

impl PrettyLogger {
    /// 显示成功消息
    pub fn success(message: impl AsRef<str>) {
        println!("{} {}", "✓".green().bold(), message.as_ref());
    }

    /// 显示信息消息
    pub fn info(message: impl AsRef<str>) {
        println!("{} {}", "ℹ".blue().bold(), message.as_ref());
    }

    /// 显示警告消息
    pub fn warning(message: impl AsRef<str>) {
        println!("{} {}", "⚠".yellow().bold(), message.as_ref());
    }

    /// 显示错误消息
    pub fn error(message: impl AsRef<str>) {
        println!("{} {}", "✗".red().bold(), message.as_ref());
    }

    /// 显示输出文件及其下载地址
    pub fn file_info(name: impl AsRef<str>, link: impl AsRef<str>) {
        println!(
            "{} {} {}",
            "📁".blue().bold(),
            name.as_ref().bold(),
            link.as_ref().bright_black()
        );
    }

    /// 显示纯文本列表项
    pub fn list_item(text: impl AsRef<str>) {
        println!("  {} {}", "•".bright_black(), text.as_ref());
    }

    /// 显示后端任务日志，按级别着色
    pub fn task_log(entry: &LogEntry) {
        let line = entry.to_string();
        match entry.level.as_str() {
            "ERROR" => println!("{}", line.red()),
            "WARN" | "WARNING" => println!("{}", line.yellow()),
            "DEBUG" => println!("{}", line.bright_black()),
            _ => println!("{}", line),
        }
    }

    /// 显示分割线
    pub fn separator() {
        println!("{}", "─".repeat(50).bright_black());
    }

    /// 显示标题
    pub fn title(text: impl AsRef<str>) {
        let text = text.as_ref();
        let width = text.chars().count().min(48);
        let padding = (48 - width) / 2;
        let line = "─".repeat(padding);
        println!(
            "{} {} {}",
            line.bright_black(),
            text.bold(),
            "─".repeat(48 - padding - width).bright_black()
        );
    }
}

/// 便捷宏用于漂亮的日志输出
#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::success(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::info(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::warning(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::error(format!($($arg)*))
    };
}
