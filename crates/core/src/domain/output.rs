/// 规整程序输出以便比较：逐行去掉首尾空白并丢弃空行，
/// 行尾空格和 `\r\n` 不影响判题。
pub fn normalize_output(output: &str) -> String {
    output
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
