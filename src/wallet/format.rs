/// Shorten an address for display: `0x1234...cdef`.
///
/// Addresses shorter than `start + end` characters are returned unchanged.
pub fn format_wallet_address(address: &str, start: usize, end: usize) -> String {
    let len = address.chars().count();
    if len < start.saturating_add(end) {
        return address.to_string();
    }
    let head: String = address.chars().take(start).collect();
    let tail: String = address.chars().skip(len - end).collect();
    format!("{head}...{tail}")
}

/// [`format_wallet_address`] with the usual 6/4 split.
pub fn format_wallet_address_default(address: &str) -> String {
    format_wallet_address(address, 6, 4)
}
