use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// 仅给出警告的违规次数上限。
pub const MAX_WARNINGS: u32 = 2;
/// 达到该违规次数时终止该用户的比赛。
pub const TERMINATION_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    FaceNotDetected,
    MultipleFaces,
    CameraBlocked,
    NoCameraAccess,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 4] = [
        ViolationKind::FaceNotDetected,
        ViolationKind::MultipleFaces,
        ViolationKind::CameraBlocked,
        ViolationKind::NoCameraAccess,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ViolationKind::FaceNotDetected => "FACE_NOT_DETECTED",
            ViolationKind::MultipleFaces => "MULTIPLE_FACES",
            ViolationKind::CameraBlocked => "CAMERA_BLOCKED",
            ViolationKind::NoCameraAccess => "NO_CAMERA_ACCESS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViolationKind::FaceNotDetected => "Face Not Detected",
            ViolationKind::MultipleFaces => "Multiple Faces",
            ViolationKind::CameraBlocked => "Camera Blocked",
            ViolationKind::NoCameraAccess => "No Camera Access",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ViolationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == s)
            .ok_or_else(|| DomainError::InvalidViolationKind(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationOutcome {
    pub kind: ViolationKind,
    pub violation_count: u32,
    pub warning_count: u32,
    /// 本次违规是否仍计为警告。
    pub warning_given: bool,
    pub terminated: bool,
}

impl ViolationOutcome {
    pub fn message(&self) -> String {
        if self.terminated {
            "Contest terminated due to multiple violations".to_string()
        } else {
            format!(
                "Warning {}/{}: {}",
                self.warning_count,
                MAX_WARNINGS,
                self.kind.label()
            )
        }
    }
}

/// 单个用户在单场比赛中的监考状态。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProctoringState {
    pub monitoring_active: bool,
    pub violation_count: u32,
    pub warning_count: u32,
    pub terminated: bool,
    pub practice_mode: bool,
    pub face_detected: bool,
    pub faces_count: u32,
}

impl ProctoringState {
    pub fn start_monitoring(&mut self) {
        self.monitoring_active = true;
        self.violation_count = 0;
        self.warning_count = 0;
        self.terminated = false;
    }

    pub fn add_violation(&mut self, kind: ViolationKind) -> ViolationOutcome {
        self.violation_count += 1;

        let warning_given = self.violation_count <= MAX_WARNINGS;
        if warning_given {
            self.warning_count += 1;
        }

        if self.violation_count >= TERMINATION_THRESHOLD {
            self.terminated = true;
            self.practice_mode = true;
            self.monitoring_active = false;
        }

        ViolationOutcome {
            kind,
            violation_count: self.violation_count,
            warning_count: self.warning_count,
            warning_given,
            terminated: self.terminated,
        }
    }

    /// 保存人脸检测结果并归类，返回对应的违规类型，但不记录违规。
    pub fn record_face_check(&mut self, faces_count: u32) -> Option<ViolationKind> {
        self.faces_count = faces_count;
        self.face_detected = faces_count >= 1;

        match faces_count {
            0 => Some(ViolationKind::FaceNotDetected),
            1 => None,
            _ => Some(ViolationKind::MultipleFaces),
        }
    }

    pub fn can_continue(&self) -> bool {
        !self.terminated && self.violation_count < TERMINATION_THRESHOLD
    }

    pub fn can_practice(&self) -> bool {
        self.practice_mode || !self.terminated
    }

    /// 本次调用开启了练习模式时返回 `true`。
    pub fn enable_practice_mode(&mut self) -> bool {
        let changed = !self.practice_mode || self.monitoring_active;
        self.practice_mode = true;
        self.monitoring_active = false;
        changed
    }

    pub fn terminate(&mut self) {
        self.terminated = true;
        self.monitoring_active = false;
    }
}
