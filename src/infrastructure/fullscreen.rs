//! 全屏控制 - 基础设施层
//!
//! 只暴露"进入/退出全屏"的能力，不认识会话和试卷

use anyhow::Result;
use std::io::{self, Write};

/// 全屏能力接口
///
/// 全屏是尽力而为的：进入失败只警告，不阻止考试开始。
/// 会话层保证退出全屏只发生在终态之后。
pub trait Fullscreen {
    fn enter(&mut self) -> Result<()>;
    fn exit(&mut self) -> Result<()>;
}

/// 无操作实现（无界面环境和测试用）
#[derive(Debug, Default)]
pub struct NoopFullscreen;

impl Fullscreen for NoopFullscreen {
    fn enter(&mut self) -> Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// 终端备用屏实现
///
/// 职责：
/// - enter: 切到终端备用屏并清屏（ANSI `?1049h`）
/// - exit: 切回主屏（ANSI `?1049l`）
/// - 进程意外退出时靠 Drop 兜底恢复主屏
#[derive(Debug, Default)]
pub struct TerminalFullscreen {
    entered: bool,
}

impl TerminalFullscreen {
    /// 创建新的终端全屏控制器
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fullscreen for TerminalFullscreen {
    fn enter(&mut self) -> Result<()> {
        if self.entered {
            return Ok(());
        }
        let mut stdout = io::stdout();
        stdout.write_all(b"\x1b[?1049h\x1b[2J\x1b[H")?;
        stdout.flush()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        let mut stdout = io::stdout();
        stdout.write_all(b"\x1b[?1049l")?;
        stdout.flush()?;
        self.entered = false;
        Ok(())
    }
}

impl Drop for TerminalFullscreen {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 记录调用顺序的测试替身
    #[derive(Debug, Default)]
    pub struct RecordingFullscreen {
        pub calls: Vec<&'static str>,
    }

    impl Fullscreen for RecordingFullscreen {
        fn enter(&mut self) -> Result<()> {
            self.calls.push("enter");
            Ok(())
        }

        fn exit(&mut self) -> Result<()> {
            self.calls.push("exit");
            Ok(())
        }
    }

    #[test]
    fn test_noop_is_always_ok() {
        let mut fs = NoopFullscreen;
        assert!(fs.enter().is_ok());
        assert!(fs.exit().is_ok());
    }

    #[test]
    fn test_recording_fake_tracks_order() {
        let mut fs = RecordingFullscreen::default();
        fs.enter().expect("enter 应该成功");
        fs.exit().expect("exit 应该成功");
        assert_eq!(fs.calls, vec!["enter", "exit"]);
    }
}
