//! Conversion logic between DTOs and domain types.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, ClientEvent, Identity, MessageKind, ServerEvent};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// DTO → Domain
// ========================================

impl From<dto::ClientMessage> for ClientEvent {
    fn from(message: dto::ClientMessage) -> Self {
        match message {
            dto::ClientMessage::Join { display_name } => ClientEvent::Join { display_name },
            dto::ClientMessage::Send { text } => ClientEvent::Send { text },
            dto::ClientMessage::Typing { is_typing } => ClientEvent::Typing { is_typing },
            dto::ClientMessage::PrivateMessage { to, text } => ClientEvent::PrivateMessage {
                recipient: to,
                text,
            },
        }
    }
}

/// Parse a text frame into a client event.
///
/// A frame that is not a JSON object is taken as plain chat text.
pub fn parse_client_frame(frame: &str) -> Result<ClientEvent, serde_json::Error> {
    match serde_json::from_str::<dto::ClientMessage>(frame) {
        Ok(message) => Ok(message.into()),
        Err(_) if !frame.trim_start().starts_with('{') => Ok(ClientEvent::Send {
            text: frame.to_string(),
        }),
        Err(e) => Err(e),
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<MessageKind> for dto::MessageKindInfo {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Broadcast => Self::Broadcast,
            MessageKind::Private => Self::Private,
            MessageKind::System => Self::System,
        }
    }
}

impl From<&ChatMessage> for dto::ChatMessageInfo {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.value(),
            kind: message.kind.into(),
            text: message.text.clone(),
            sender: message.sender_display_name.clone(),
            sender_id: message
                .sender_connection_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
            recipient_id: message
                .recipient_connection_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
            timestamp: message.timestamp.value(),
        }
    }
}

impl From<&Identity> for dto::IdentityInfo {
    fn from(identity: &Identity) -> Self {
        Self {
            connection_id: identity.connection_id.as_str().to_string(),
            display_name: identity.display_name.as_str().to_string(),
            joined_at: identity.joined_at.value(),
        }
    }
}

impl From<&ServerEvent> for dto::ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Connected(connection_id) => Self::Connected {
                connection_id: connection_id.as_str().to_string(),
            },
            ServerEvent::PresenceList(identities) => Self::PresenceList {
                users: identities.iter().map(Into::into).collect(),
            },
            ServerEvent::SystemNotice(notice) => Self::SystemNotice {
                id: notice.id.value(),
                text: notice.text.clone(),
                timestamp: notice.timestamp.value(),
            },
            ServerEvent::Message(message) => Self::Message(message.into()),
            ServerEvent::HistorySnapshot(messages) => Self::HistorySnapshot {
                messages: messages.iter().map(Into::into).collect(),
            },
            ServerEvent::TypingList(names) => Self::TypingList {
                display_names: names.iter().map(|n| n.as_str().to_string()).collect(),
            },
            ServerEvent::PrivateMessage(message) => Self::PrivateMessage(message.into()),
        }
    }
}

impl From<&ChatMessage> for http::MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.value(),
            kind: message.kind.into(),
            text: message.text.clone(),
            sender: message.sender_display_name.clone(),
            sender_id: message
                .sender_connection_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
            timestamp: timestamp_to_rfc3339(message.timestamp.value()),
        }
    }
}

impl From<&Identity> for http::UserDto {
    fn from(identity: &Identity) -> Self {
        Self {
            connection_id: identity.connection_id.as_str().to_string(),
            display_name: identity.display_name.as_str().to_string(),
            joined_at: timestamp_to_rfc3339(identity.joined_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, DisplayName, MessageId, MessageText, Timestamp};

    fn alice() -> Identity {
        Identity::new(
            ConnectionId::new("c-alice".to_string()).unwrap(),
            DisplayName::new("alice").unwrap(),
            Timestamp::new(1672531200000),
        )
    }

    #[test]
    fn test_parse_join_frame() {
        // テスト項目: join フレームが ClientEvent::Join に変換される
        // given (前提条件):
        let frame = r#"{"type":"join","display_name":"alice"}"#;

        // when (操作):
        let event = parse_client_frame(frame).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Join {
                display_name: "alice".to_string()
            }
        );
    }

    #[test]
    fn test_parse_private_message_frame() {
        // テスト項目: private_message フレームの to が宛先として扱われる
        // given (前提条件):
        let frame = r#"{"type":"private_message","to":"c-bob","text":"hey"}"#;

        // when (操作):
        let event = parse_client_frame(frame).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::PrivateMessage {
                recipient: "c-bob".to_string(),
                text: "hey".to_string()
            }
        );
    }

    #[test]
    fn test_parse_plain_text_frame_as_send() {
        // テスト項目: JSON でないフレームはそのまま本文として送信扱いになる
        // given (前提条件):
        let frame = "hello there";

        // when (操作):
        let event = parse_client_frame(frame).unwrap();

        // then (期待する結果):
        assert_eq!(
            event,
            ClientEvent::Send {
                text: "hello there".to_string()
            }
        );
    }

    #[test]
    fn test_parse_malformed_json_is_error() {
        // テスト項目: 不正な JSON オブジェクトはエラーになる
        // given (前提条件):
        let frame = r#"{"type":"typing","is_typing":"yes"}"#;

        // when (操作):
        let result = parse_client_frame(frame);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_message_event_serializes_with_type_tag() {
        // テスト項目: message イベントが type タグ付きの JSON になる
        // given (前提条件):
        let message = ChatMessage::broadcast(
            MessageId::new(7),
            &alice(),
            MessageText::new("hi".to_string()).unwrap(),
            Timestamp::new(1000),
        );
        let event = ServerEvent::Message(message);

        // when (操作):
        let json = serde_json::to_value(dto::ServerMessage::from(&event)).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "type": "message",
                "id": 7,
                "kind": "broadcast",
                "text": "hi",
                "sender": "alice",
                "sender_id": "c-alice",
                "timestamp": 1000
            })
        );
    }

    #[test]
    fn test_typing_list_serialization() {
        // テスト項目: typing_list イベントが表示名の配列になる
        // given (前提条件):
        let event = ServerEvent::TypingList(vec![DisplayName::new("bob").unwrap()]);

        // when (操作):
        let json = serde_json::to_value(dto::ServerMessage::from(&event)).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"type": "typing_list", "display_names": ["bob"]})
        );
    }

    #[test]
    fn test_system_notice_has_no_sender_id_over_http() {
        // テスト項目: system メッセージの HTTP DTO には sender_id が含まれない
        // given (前提条件):
        let notice = ChatMessage::system(
            MessageId::new(1),
            "alice joined the chat".to_string(),
            Timestamp::new(1672531200000),
        );

        // when (操作):
        let dto = http::MessageDto::from(&notice);
        let json = serde_json::to_value(&dto).unwrap();

        // then (期待する結果):
        assert_eq!(dto.sender, "system");
        assert_eq!(dto.timestamp, "2023-01-01T00:00:00.000Z");
        assert!(json.get("sender_id").is_none());
    }

    #[test]
    fn test_identity_to_user_dto() {
        // テスト項目: Identity が UserDto に変換される
        // given (前提条件):
        let identity = alice();

        // when (操作):
        let dto = http::UserDto::from(&identity);

        // then (期待する結果):
        assert_eq!(dto.connection_id, "c-alice");
        assert_eq!(dto.display_name, "alice");
        assert_eq!(dto.joined_at, "2023-01-01T00:00:00.000Z");
    }
}
