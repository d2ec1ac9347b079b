use std::str::FromStr;

/// 违规信号类型
///
/// 只有切屏和退出全屏计入违规次数并上报服务端；
/// 复制、粘贴、右键属于"拦截并警告"，不计数、不上报。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// 切屏离开考试页面
    TabSwitch,
    /// 退出全屏
    ExitFullscreen,
    /// 尝试复制
    CopyAttempt,
    /// 尝试粘贴
    PasteAttempt,
    /// 打开右键菜单
    ContextMenu,
}

impl ViolationKind {
    /// 获取上报用的类型编码
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::TabSwitch => "tab_switch",
            ViolationKind::ExitFullscreen => "exit_fullscreen",
            ViolationKind::CopyAttempt => "copy_attempt",
            ViolationKind::PasteAttempt => "paste_attempt",
            ViolationKind::ContextMenu => "context_menu",
        }
    }

    /// 获取中文名称
    pub fn label(self) -> &'static str {
        match self {
            ViolationKind::TabSwitch => "切屏离开",
            ViolationKind::ExitFullscreen => "退出全屏",
            ViolationKind::CopyAttempt => "尝试复制",
            ViolationKind::PasteAttempt => "尝试粘贴",
            ViolationKind::ContextMenu => "打开右键菜单",
        }
    }

    /// 是否计入违规次数
    pub fn is_counted(self) -> bool {
        matches!(self, ViolationKind::TabSwitch | ViolationKind::ExitFullscreen)
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 违规类型解析错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("无法解析违规类型: {0}")]
pub struct ParseViolationKindError(pub String);

impl FromStr for ViolationKind {
    type Err = ParseViolationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tab_switch" => Ok(ViolationKind::TabSwitch),
            "exit_fullscreen" => Ok(ViolationKind::ExitFullscreen),
            "copy_attempt" => Ok(ViolationKind::CopyAttempt),
            "paste_attempt" => Ok(ViolationKind::PasteAttempt),
            "context_menu" => Ok(ViolationKind::ContextMenu),
            _ => Err(ParseViolationKindError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_code_roundtrip() {
        let kinds = [
            ViolationKind::TabSwitch,
            ViolationKind::ExitFullscreen,
            ViolationKind::CopyAttempt,
            ViolationKind::PasteAttempt,
            ViolationKind::ContextMenu,
        ];
        for kind in kinds {
            let parsed: ViolationKind = kind.as_str().parse().expect("编码应该能解析回来");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_unknown_code_fails() {
        let result: Result<ViolationKind, _> = "screenshot".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_only_tab_switch_and_exit_fullscreen_are_counted() {
        assert!(ViolationKind::TabSwitch.is_counted());
        assert!(ViolationKind::ExitFullscreen.is_counted());
        assert!(!ViolationKind::CopyAttempt.is_counted());
        assert!(!ViolationKind::PasteAttempt.is_counted());
        assert!(!ViolationKind::ContextMenu.is_counted());
    }
}
