/// Hides the local part of an address for logs: `alerts@example.com` -> `a***@example.com`.
pub fn mask_email(address: &str) -> String {
    if let Some((local, domain)) = address.split_once('@') {
        if let Some(first) = local.chars().next() {
            if !domain.is_empty() {
                return format!("{first}***@{domain}");
            }
        }
    }
    "***".to_string()
}
