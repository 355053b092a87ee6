//! A thing carrying markup payloads, and the sanitized view the API must serve

use chrono::{DateTime, Utc};
use thingful_api_types::{Thing, ThingView, User};

use super::expected::{expected_thing, FixtureError};

pub const MALICIOUS_THING_ID: i32 = 911;

const MALICIOUS_TITLE: &str = r#"Naughty naughty very naughty <script>alert("xss");</script>"#;
const SANITIZED_TITLE: &str = r#"Naughty naughty very naughty &lt;script&gt;alert("xss");&lt;/script&gt;"#;

const MALICIOUS_CONTENT: &str = r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#;
const SANITIZED_CONTENT: &str =
    r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#;

/// The stored row and the view served for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaliciousThing {
    pub thing: Thing,
    pub expected: ThingView,
}

/// Build the malicious thing authored by `user`, stamped with the current time
pub fn make_malicious_thing(user: &User) -> Result<MaliciousThing, FixtureError> {
    make_malicious_thing_at(user, Utc::now())
}

/// Same as [`make_malicious_thing`] with an explicit creation time
///
/// The time is truncated to milliseconds, the precision the API serves.
pub fn make_malicious_thing_at(
    user: &User,
    created: DateTime<Utc>,
) -> Result<MaliciousThing, FixtureError> {
    let date_created =
        DateTime::from_timestamp_millis(created.timestamp_millis()).unwrap_or(created);

    let thing = Thing {
        id: MALICIOUS_THING_ID,
        title: MALICIOUS_TITLE.to_string(),
        style: "How-to".to_string(),
        author_id: user.id,
        date_created,
        content: MALICIOUS_CONTENT.to_string(),
    };

    let mut expected = expected_thing(std::slice::from_ref(user), &thing, &[])?;
    expected.title = SANITIZED_TITLE.to_string();
    expected.content = SANITIZED_CONTENT.to_string();

    Ok(MaliciousThing { thing, expected })
}
