use crate::{Message, Role};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Fixed base timestamp so fixtures are deterministic.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Single message with an explicit id.
pub fn message(id: &str, role: Role, content: &str) -> Message {
    Message::new(id, role, base_time(), content)
}

/// `count` messages with ids `m0..m{count-1}`, alternating user/agent, one minute apart.
pub fn messages(count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let role = if i % 2 == 0 { Role::User } else { Role::Agent };
            Message::new(
                format!("m{i}"),
                role,
                base_time() + Duration::minutes(i as i64),
                format!("message {i}"),
            )
        })
        .collect()
}
