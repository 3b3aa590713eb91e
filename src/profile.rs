/*!
 * WLAN profile artifact
 *
 * Renders the XML document `netsh wlan add profile` consumes: the target
 * network as both profile name and SSID, ESS infrastructure, automatic
 * connection, and a WPA2-PSK/AES passphrase block carrying the candidate
 * password.
 */

use anyhow::{Context, Result};
use std::path::Path;

/// Escape the characters XML treats as markup. The SSID and the
/// candidate password are free text and must land in the document
/// literally.
fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Render the profile document for `ssid` with `password` as the
/// pre-shared key.
pub fn render(ssid: &str, password: &str) -> String {
    let ssid = escape_xml(ssid);
    let password = escape_xml(password);
    format!(
        r#"<?xml version="1.0"?>
<WLANProfile xmlns="http://www.microsoft.com/networking/WLAN/profile/v1">
    <name>{ssid}</name>
    <SSIDConfig>
        <SSID>
            <name>{ssid}</name>
        </SSID>
    </SSIDConfig>
    <connectionType>ESS</connectionType>
    <connectionMode>auto</connectionMode>
    <MSM>
        <security>
            <authEncryption>
                <authentication>WPA2PSK</authentication>
                <encryption>AES</encryption>
                <useOneX>false</useOneX>
            </authEncryption>
            <sharedKey>
                <keyType>passPhrase</keyType>
                <protected>false</protected>
                <keyMaterial>{password}</keyMaterial>
            </sharedKey>
        </security>
    </MSM>
</WLANProfile>
"#
    )
}

/// Write the profile for one attempt. The file is fully written and
/// closed before this returns, so the registration step that follows
/// reads a complete document.
pub fn write(path: &Path, ssid: &str, password: &str) -> Result<()> {
    std::fs::write(path, render(ssid, password))
        .with_context(|| format!("failed to write profile to {}", path.display()))
}
