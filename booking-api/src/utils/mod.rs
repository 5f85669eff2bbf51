// Utility functions for the booking API

/// Mask email address for logs
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let local = &email[..at_pos];
        let domain = &email[at_pos..];

        if local.chars().count() <= 2 {
            return format!("***{}", domain);
        }

        let visible: String = local.chars().take(2).collect();
        format!("{}***{}", visible, domain)
    } else {
        "***".to_string()
    }
}
