/// Shorten an address for display: first five characters, ellipsis, last
/// four. Addresses too short to shorten are returned unchanged.
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 9 {
        return address.to_string();
    }
    format!("{}...{}", &address[..5], &address[address.len() - 4..])
}
