//! 比赛页面的摄像头验证。
//!
//! 每个用户在每场比赛有三个会话级标记，再加上监考会话的 `face_detected`，
//! 任意一个成立即可进入需要监考的比赛。

/// 同一用户同一比赛跨请求保存的标记。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraFlags {
    /// 人脸检测通过后授予，下一次打开题目时消耗。
    pub one_time_pass: bool,
    /// 客户端自行验证摄像头后设置。
    pub camera_verified: bool,
    /// 在比赛内切换页面时保持验证有效。
    pub camera_active: bool,
}

impl CameraFlags {
    pub fn any(&self) -> bool {
        self.one_time_pass || self.camera_verified || self.camera_active
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateInput {
    pub requires_proctoring: bool,
    pub is_running: bool,
    pub has_final_submitted: bool,
    pub terminated: bool,
    pub face_detected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ProctoringDisabled,
    NotRunning,
    AlreadySubmitted,
    PracticeMode,
}

impl SkipReason {
    pub fn message(self) -> &'static str {
        match self {
            SkipReason::ProctoringDisabled => "Contest proctoring disabled",
            SkipReason::NotRunning => "Contest not currently active",
            SkipReason::AlreadySubmitted => "Contest already submitted",
            SkipReason::PracticeMode => {
                "Practice mode enabled - Contest terminated due to violations"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDecision {
    pub skip_reason: Option<SkipReason>,
    pub practice_mode: bool,
    pub require_proctor: bool,
    pub camera_verified: bool,
}

fn skip_reason(input: &GateInput) -> Option<SkipReason> {
    if !input.requires_proctoring {
        Some(SkipReason::ProctoringDisabled)
    } else if !input.is_running {
        Some(SkipReason::NotRunning)
    } else if input.has_final_submitted {
        Some(SkipReason::AlreadySubmitted)
    } else if input.terminated {
        Some(SkipReason::PracticeMode)
    } else {
        None
    }
}

/// 判断比赛页面是否需要摄像头验证。
pub fn evaluate_contest_entry(input: &GateInput, flags: &mut CameraFlags) -> EntryDecision {
    match skip_reason(input) {
        Some(reason) => {
            if matches!(reason, SkipReason::AlreadySubmitted | SkipReason::PracticeMode) {
                flags.clear();
            }
            EntryDecision {
                skip_reason: Some(reason),
                practice_mode: reason == SkipReason::PracticeMode,
                require_proctor: false,
                camera_verified: false,
            }
        }
        None => {
            let verified = input.face_detected || flags.any();
            if verified {
                flags.camera_active = true;
            }
            EntryDecision {
                skip_reason: None,
                practice_mode: false,
                require_proctor: !verified,
                camera_verified: verified,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemAccess {
    Allowed {
        practice_mode: bool,
        require_proctor: bool,
        skip_reason: Option<SkipReason>,
    },
    /// 需要回到比赛页面完成摄像头验证。
    VerificationRequired,
}

/// 判断需要监考的比赛中的题目能否打开。
pub fn evaluate_problem_access(input: &GateInput, flags: &mut CameraFlags) -> ProblemAccess {
    if let Some(reason) = skip_reason(input) {
        return ProblemAccess::Allowed {
            practice_mode: input.terminated,
            require_proctor: false,
            skip_reason: Some(reason),
        };
    }

    if !(input.face_detected || flags.any()) {
        return ProblemAccess::VerificationRequired;
    }

    flags.camera_active = true;
    flags.one_time_pass = false;

    ProblemAccess::Allowed {
        practice_mode: false,
        require_proctor: true,
        skip_reason: None,
    }
}
