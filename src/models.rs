//! Typed models for the host's XML responses
//!
//! Each control endpoint answers with an XML document whose `<root>` element
//! carries a `status_code` attribute. The raw shapes are deserialized with
//! quick-xml/serde and then validated into the public types, so a malformed
//! document surfaces a structured error instead of silently producing
//! defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Server state suffix reported while no streaming session is active.
///
/// GFE 2.8 started keeping `currentgame` set to the last game played, so the
/// reported id no longer means "currently streaming". Whenever the state
/// carries this suffix the current game is forced to zero to contain that
/// quirk.
const STATE_SERVER_AVAILABLE: &str = "_SERVER_AVAILABLE";

/// Snapshot of `/serverinfo`: pairing status, active session and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Whether this client is paired with the host
    pub paired: bool,
    /// Id of the application being streamed, 0 when none
    pub current_game: u32,
    /// Major version of the host's protocol (first digit of `appversion`)
    pub server_major_version: u32,
    /// Raw textual server state, e.g. `SUNSHINE_SERVER_BUSY`
    pub state: String,
}

/// One launchable title from the host's application directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    /// Display title
    pub title: String,
    /// Numeric id used for launch/resume/quit
    pub id: u32,
    /// Whether the host reports the title as currently running
    pub running: bool,
}

#[derive(Debug, Deserialize)]
struct ServerInfoXml {
    #[serde(rename = "@status_code", default)]
    status_code: Option<u16>,
    #[serde(rename = "PairStatus", default)]
    pair_status: Option<String>,
    #[serde(rename = "currentgame", default)]
    current_game: Option<String>,
    #[serde(rename = "appversion", default)]
    app_version: Option<String>,
    #[serde(rename = "state", default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AppListXml {
    #[serde(rename = "@status_code", default)]
    status_code: Option<u16>,
    #[serde(rename = "App", default)]
    apps: Vec<AppXml>,
}

#[derive(Debug, Deserialize)]
struct AppXml {
    #[serde(rename = "AppTitle", default)]
    title: Option<String>,
    #[serde(rename = "ID", default)]
    id: Option<String>,
    #[serde(rename = "IsRunning", default)]
    is_running: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PairResponseXml {
    #[serde(rename = "@status_code", default)]
    status_code: Option<u16>,
    #[serde(rename = "paired", default)]
    paired: Option<String>,
}

fn check_status(status_code: Option<u16>) -> Result<()> {
    match status_code {
        Some(200) => Ok(()),
        Some(code) => Err(Error::ServerStatus(code)),
        None => Err(Error::MissingField("status_code")),
    }
}

/// The host encodes booleans as the element text `1`.
fn flag_is_set(text: &str) -> bool {
    text.trim() == "1"
}

fn parse_u32(field: &'static str, text: &str) -> Result<u32> {
    let trimmed = text.trim();
    trimmed
        .parse()
        .map_err(|_| Error::InvalidField(field, trimmed.to_string()))
}

/// Major protocol version: first digit of the `appversion` text, e.g. 7 for
/// "7.1.431.0".
fn parse_major_version(text: &str) -> Result<u32> {
    text.trim()
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| Error::InvalidField("appversion", text.trim().to_string()))
}

impl ServerInfo {
    /// Parse a `/serverinfo` response document.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let raw: ServerInfoXml = quick_xml::de::from_str(xml)?;
        check_status(raw.status_code)?;

        let pair_status = raw.pair_status.ok_or(Error::MissingField("PairStatus"))?;
        let current_game = raw.current_game.ok_or(Error::MissingField("currentgame"))?;
        let app_version = raw.app_version.ok_or(Error::MissingField("appversion"))?;
        let state = raw
            .state
            .ok_or(Error::MissingField("state"))?
            .trim()
            .to_string();

        let mut current_game = parse_u32("currentgame", &current_game)?;
        if state.ends_with(STATE_SERVER_AVAILABLE) {
            current_game = 0;
        }

        Ok(ServerInfo {
            paired: flag_is_set(&pair_status),
            current_game,
            server_major_version: parse_major_version(&app_version)?,
            state,
        })
    }
}

/// Parse a `/applist` response into application records, preserving order.
pub(crate) fn parse_app_list(xml: &str) -> Result<Vec<App>> {
    let raw: AppListXml = quick_xml::de::from_str(xml)?;
    check_status(raw.status_code)?;

    raw.apps
        .into_iter()
        .map(|app| {
            let title = app.title.ok_or(Error::MissingField("AppTitle"))?;
            let id = app.id.ok_or(Error::MissingField("ID"))?;
            let is_running = app.is_running.ok_or(Error::MissingField("IsRunning"))?;
            Ok(App {
                title: title.trim().to_string(),
                id: parse_u32("ID", &id)?,
                running: flag_is_set(&is_running),
            })
        })
        .collect()
}

/// Parse a `/pair` completion response; paired iff the document reports
/// status 200 and `<paired>1</paired>`.
pub(crate) fn parse_pair_response(xml: &str) -> Result<bool> {
    let raw: PairResponseXml = quick_xml::de::from_str(xml)?;
    Ok(raw.status_code == Some(200) && raw.paired.as_deref().is_some_and(flag_is_set))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_info_xml(status: u16, pair: &str, game: u32, version: &str, state: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<root protocol_version="0.1" query="serverinfo" status_code="{status}">
  <PairStatus>{pair}</PairStatus>
  <currentgame>{game}</currentgame>
  <appversion>{version}</appversion>
  <state>{state}</state>
</root>"#
        )
    }

    #[test]
    fn test_server_info_success() {
        let xml = server_info_xml(200, "1", 5, "7.1.431.0", "SUNSHINE_SERVER_BUSY");
        let info = ServerInfo::from_xml(&xml).unwrap();
        assert!(info.paired);
        assert_eq!(info.current_game, 5);
        assert_eq!(info.server_major_version, 7);
        assert_eq!(info.state, "SUNSHINE_SERVER_BUSY");
    }

    #[test]
    fn test_server_available_overrides_current_game() {
        let xml = server_info_xml(200, "1", 5, "7.1", "SUNSHINE_SERVER_AVAILABLE");
        let info = ServerInfo::from_xml(&xml).unwrap();
        assert_eq!(info.current_game, 0);
    }

    #[test]
    fn test_pair_status_text_is_trimmed() {
        // Hosts pad element text with whitespace; the flag is the text "1".
        let xml = server_info_xml(200, " 1 ", 0, "7.1", "SUNSHINE_SERVER_AVAILABLE");
        assert!(ServerInfo::from_xml(&xml).unwrap().paired);

        let xml = server_info_xml(200, "0", 0, "7.1", "SUNSHINE_SERVER_AVAILABLE");
        assert!(!ServerInfo::from_xml(&xml).unwrap().paired);
    }

    #[test]
    fn test_server_info_non_200_status() {
        let xml = server_info_xml(401, "0", 0, "7.1", "SUNSHINE_SERVER_AVAILABLE");
        match ServerInfo::from_xml(&xml) {
            Err(Error::ServerStatus(401)) => {}
            other => panic!("expected ServerStatus(401), got {other:?}"),
        }
    }

    #[test]
    fn test_server_info_missing_field() {
        let xml = r#"<root status_code="200"><PairStatus>1</PairStatus></root>"#;
        match ServerInfo::from_xml(xml) {
            Err(Error::MissingField("currentgame")) => {}
            other => panic!("expected MissingField(currentgame), got {other:?}"),
        }
    }

    #[test]
    fn test_server_info_bad_current_game() {
        let xml = server_info_xml(200, "1", 0, "7.1", "SUNSHINE_SERVER_BUSY")
            .replace("<currentgame>0</currentgame>", "<currentgame>abc</currentgame>");
        match ServerInfo::from_xml(&xml) {
            Err(Error::InvalidField("currentgame", value)) => assert_eq!(value, "abc"),
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_app_list_parse() {
        let xml = r#"<root status_code="200">
  <App><AppTitle>Steam</AppTitle><ID>1</ID><IsRunning>0</IsRunning></App>
  <App><AppTitle> Desktop </AppTitle><ID>2</ID><IsRunning> 1 </IsRunning></App>
</root>"#;
        let apps = parse_app_list(xml).unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].title, "Steam");
        assert_eq!(apps[0].id, 1);
        assert!(!apps[0].running);
        assert_eq!(apps[1].title, "Desktop");
        assert!(apps[1].running);
    }

    #[test]
    fn test_app_list_empty() {
        let apps = parse_app_list(r#"<root status_code="200"></root>"#).unwrap();
        assert!(apps.is_empty());
    }

    #[test]
    fn test_app_list_non_200_status() {
        match parse_app_list(r#"<root status_code="401"></root>"#) {
            Err(Error::ServerStatus(401)) => {}
            other => panic!("expected ServerStatus(401), got {other:?}"),
        }
    }

    #[test]
    fn test_pair_response() {
        let xml = r#"<root status_code="200"><paired>1</paired></root>"#;
        assert!(parse_pair_response(xml).unwrap());

        let xml = r#"<root status_code="200"><paired>0</paired></root>"#;
        assert!(!parse_pair_response(xml).unwrap());

        // Missing element or failed status both mean "not paired".
        assert!(!parse_pair_response(r#"<root status_code="200"></root>"#).unwrap());
        let xml = r#"<root status_code="401"><paired>1</paired></root>"#;
        assert!(!parse_pair_response(xml).unwrap());
    }

    #[test]
    fn test_garbage_is_an_xml_error() {
        assert!(matches!(
            ServerInfo::from_xml("not an xml document"),
            Err(Error::Xml(_))
        ));
    }
}
