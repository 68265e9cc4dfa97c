//! 题目的编辑器初始代码。
//!
//! 题目可以按语言自带模板，也可以声明函数签名；有签名时为编辑器语言生成桩代码。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Language;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureParam {
    #[serde(default = "default_param_name")]
    pub name: String,
    #[serde(default, rename = "type")]
    pub param_type: Option<String>,
}

fn default_param_name() -> String {
    "arg".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<SignatureParam>,
    pub return_type: String,
}

impl FunctionSignature {
    /// 由题目表中的签名列构造签名，未启用或没有函数名时为 `None`。
    pub fn from_columns(
        enabled: bool,
        name: &str,
        params_json: &str,
        return_type: &str,
    ) -> Option<Self> {
        if !enabled || name.trim().is_empty() {
            return None;
        }

        let params = if params_json.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(params_json).ok()?
        };

        Some(Self {
            name: name.trim().to_string(),
            params,
            return_type: return_type.to_string(),
        })
    }

    fn param_names(&self) -> String {
        self.params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn typed_params(&self, map_type: fn(Option<&str>) -> &'static str) -> String {
        self.params
            .iter()
            .map(|p| format!("{} {}", map_type(p.param_type.as_deref()), p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn is_int_type(t: &str) -> bool {
    matches!(t, "int" | "integer" | "number")
}

fn is_string_type(t: &str) -> bool {
    matches!(t, "str" | "string" | "text")
}

fn java_type(t: Option<&str>) -> &'static str {
    let t = t.unwrap_or_default().to_ascii_lowercase();
    if is_string_type(&t) { "String" } else { "int" }
}

fn cpp_type(t: Option<&str>) -> &'static str {
    let t = t.unwrap_or_default().to_ascii_lowercase();
    if is_int_type(&t) { "int" } else { "string" }
}

fn c_type(_: Option<&str>) -> &'static str {
    "int"
}

/// 按签名生成桩代码，不支持的语言返回 `None`。
pub fn generate_stub(signature: &FunctionSignature, language: Language) -> Option<String> {
    let name = &signature.name;
    let return_type = Some(signature.return_type.as_str());

    let stub = match language {
        Language::Python => format!(
            "# Complete the function below\n\ndef {name}({args}):\n    pass\n\n\
             if __name__ == '__main__':\n    # You can test your function here\n    pass\n",
            args = signature.param_names()
        ),
        Language::Java => format!(
            "import java.util.*;\n\nclass Solution {{\n    public {ret} {name}({args}) {{\n        \
             // TODO: implement\n        return 0;\n    }}\n}}\n\npublic class Main {{\n    \
             public static void main(String[] args){{\n        // You can test Solution here\n    \
             }}\n}}\n",
            ret = java_type(return_type),
            args = signature.typed_params(java_type)
        ),
        Language::Cpp => {
            let ret = cpp_type(return_type);
            format!(
                "#include <bits/stdc++.h>\nusing namespace std;\n\n{ret} {name}({args}) {{\n    \
                 // TODO: implement\n    return {default};\n}}\n\nint main(){{\n    \
                 ios::sync_with_stdio(false); cin.tie(nullptr);\n    \
                 // You can test your function here\n    return 0;\n}}\n",
                args = signature.typed_params(cpp_type),
                default = if ret == "int" { "0" } else { "\"\"" }
            )
        }
        Language::C => format!(
            "{ret} {name}({args}) {{\n    // TODO: implement\n    return 0;\n}}\n\n\
             int main(){{\n    // You can test your function here\n    return 0;\n}}\n",
            ret = c_type(return_type),
            args = signature.typed_params(c_type)
        ),
        Language::JavaScript => format!(
            "function {name}({args}) {{\n  // TODO: implement\n}}\n\n\
             function main(){{\n  // You can test your function here\n}}\n\nmain();\n",
            args = signature.param_names()
        ),
        _ => return None,
    };

    Some(stub)
}

/// 编辑器语言的内置模板。
pub fn default_boilerplate(language: Language) -> Option<&'static str> {
    let code = match language {
        Language::Python => {
            "# Write your code here\n\nimport sys\n\ndef solve():\n    # TODO: implement\n    pass\n\n\
             if __name__ == '__main__':\n    solve()\n"
        }
        Language::Java => {
            "// Write your code here\nimport java.util.*;\n\npublic class Main {\n    \
             public static void main(String[] args) {\n        Scanner sc = new Scanner(System.in);\n        \
             // TODO: implement\n    }\n}\n"
        }
        Language::Cpp => {
            "// Write your code here\n#include <bits/stdc++.h>\nusing namespace std;\n\nint main(){\n    \
             ios::sync_with_stdio(false);\n    cin.tie(nullptr);\n    // TODO: implement\n    return 0;\n}\n"
        }
        Language::C => {
            "// Write your code here\n#include <stdio.h>\n\nint main(){\n    // TODO: implement\n    \
             return 0;\n}\n"
        }
        Language::JavaScript => {
            "// Write your code here\n'use strict';\n\nfunction main(){\n  // TODO: implement\n}\n\nmain();\n"
        }
        _ => return None,
    };
    Some(code)
}

/// 解析保存的「语言代码 -> 模板」JSON。
pub fn parse_boilerplate(raw: &str) -> BTreeMap<String, String> {
    if raw.trim().is_empty() {
        return BTreeMap::new();
    }
    serde_json::from_str(raw).unwrap_or_default()
}

/// 单个语言的初始代码：桩代码优先，其次自定义模板，最后内置模板。
pub fn boilerplate_for(
    language: Language,
    custom: &BTreeMap<String, String>,
    signature: Option<&FunctionSignature>,
) -> String {
    if let Some(stub) = signature.and_then(|sig| generate_stub(sig, language)) {
        return stub;
    }

    custom
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(language.code()))
        .map(|(_, code)| code.clone())
        .or_else(|| default_boilerplate(language).map(str::to_string))
        .unwrap_or_default()
}

/// 编辑器提供的所有语言的模板，以语言代码为键。
///
/// 自定义模板优先于生成的桩代码，桩代码优先于内置模板。
pub fn boilerplate_map(
    custom: &BTreeMap<String, String>,
    signature: Option<&FunctionSignature>,
) -> BTreeMap<String, String> {
    let mut merged: BTreeMap<String, String> = Language::EDITOR
        .into_iter()
        .filter_map(|language| {
            default_boilerplate(language).map(|code| (language.code().to_string(), code.to_string()))
        })
        .collect();

    merged.extend(
        custom
            .iter()
            .map(|(key, code)| (key.to_ascii_uppercase(), code.clone())),
    );

    if let Some(signature) = signature {
        for language in Language::EDITOR {
            let has_custom = custom
                .keys()
                .any(|key| key.eq_ignore_ascii_case(language.code()));
            if has_custom {
                continue;
            }
            if let Some(stub) = generate_stub(signature, language) {
                merged.insert(language.code().to_string(), stub);
            }
        }
    }

    merged
}
