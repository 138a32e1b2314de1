pub mod ip;

/// slug 最大长度（字节）
pub const MAX_SLUG_LEN: usize = 512;

/// 检查候选 slug 是否可以安全地用于查询
///
/// 允许 `/` 分隔的多段路径；拒绝空串、超长、控制字符以及空段。
pub fn is_valid_slug_path(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && !slug.chars().any(char::is_control)
        && slug.split('/').all(|segment| !segment.is_empty())
}

/// 将原始（未解码的）请求路径拆成非空段，再逐段百分号解码
///
/// 先拆分后解码，`%2F` 因此留在段内而不会产生新段。
/// 解码后不是合法 UTF-8 的段保持原样。
pub fn split_path_segments(raw_path: &str) -> Vec<String> {
    raw_path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            urlencoding::decode(s)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| s.to_string())
        })
        .collect()
}
