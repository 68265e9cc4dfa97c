use std::fmt;
use std::str::FromStr;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    C,
    Cpp,
    CSharp,
    Clojure,
    Css,
    Haskell,
    Java,
    JavaScript,
    ObjectiveC,
    Perl,
    Php,
    Python,
    R,
    Ruby,
    Rust,
    Scala,
}

impl Language {
    pub const ALL: [Language; 16] = [
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Clojure,
        Language::Css,
        Language::Haskell,
        Language::Java,
        Language::JavaScript,
        Language::ObjectiveC,
        Language::Perl,
        Language::Php,
        Language::Python,
        Language::R,
        Language::Ruby,
        Language::Rust,
        Language::Scala,
    ];

    /// 编辑器提供模板的语言。
    pub const EDITOR: [Language; 5] = [
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::JavaScript,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "CPP",
            Language::CSharp => "CSHARP",
            Language::Clojure => "CLOJURE",
            Language::Css => "CSS",
            Language::Haskell => "HASKELL",
            Language::Java => "JAVA",
            Language::JavaScript => "JAVASCRIPT",
            Language::ObjectiveC => "OBJECTIVEC",
            Language::Perl => "PERL",
            Language::Php => "PHP",
            Language::Python => "PYTHON",
            Language::R => "R",
            Language::Ruby => "RUBY",
            Language::Rust => "RUST",
            Language::Scala => "SCALA",
        }
    }

    /// 外部评测服务使用的语言代码。
    pub fn judge_code(self) -> &'static str {
        match self {
            Language::Cpp => "CPP17",
            Language::Java => "JAVA17",
            Language::JavaScript => "JAVASCRIPT_NODE",
            Language::Python => "PYTHON3",
            other => other.code(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let alias = match upper.as_str() {
            "C++" => "CPP",
            other => other,
        };

        Self::ALL
            .into_iter()
            .find(|language| language.code() == alias)
            .ok_or_else(|| DomainError::UnsupportedLanguage(s.to_string()))
    }
}
