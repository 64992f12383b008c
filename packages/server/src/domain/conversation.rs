//! Conversation keys select a history stream.

use super::value_object::{RoomName, UserName};

/// Unordered pair of participants of a private conversation.
///
/// The pair is stored in lexicographic order, so `(alice, bob)` and
/// `(bob, alice)` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrivatePair {
    low: UserName,
    high: UserName,
}

impl PrivatePair {
    pub fn new(a: UserName, b: UserName) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn participants(&self) -> (&UserName, &UserName) {
        (&self.low, &self.high)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversationKey {
    Group,
    Room(RoomName),
    Private(PrivatePair),
}

impl ConversationKey {
    pub fn room(name: RoomName) -> Self {
        ConversationKey::Room(name)
    }

    pub fn private(a: UserName, b: UserName) -> Self {
        ConversationKey::Private(PrivatePair::new(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> UserName {
        UserName::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_private_key_is_direction_independent() {
        // テスト項目: 送信方向に関係なく同じ private キーになる
        // given (前提条件):
        let alice = name("alice");
        let bob = name("bob");

        // when (操作):
        let a_to_b = ConversationKey::private(alice.clone(), bob.clone());
        let b_to_a = ConversationKey::private(bob, alice);

        // then (期待する結果):
        assert_eq!(a_to_b, b_to_a);
    }

    #[test]
    fn test_private_pair_orders_participants() {
        // テスト項目: 参加者が辞書順に並ぶ
        // given (前提条件):
        let pair = PrivatePair::new(name("zoe"), name("amy"));

        // when (操作):
        let (low, high) = pair.participants();

        // then (期待する結果):
        assert_eq!(low.as_str(), "amy");
        assert_eq!(high.as_str(), "zoe");
    }

    #[test]
    fn test_room_key_differs_from_group_key() {
        // テスト項目: "group" という名前のルームでもグループキーとは区別される
        // given (前提条件):
        let room = RoomName::new("group".to_string()).unwrap();

        // when (操作):
        let key = ConversationKey::room(room);

        // then (期待する結果):
        assert_ne!(key, ConversationKey::Group);
    }
}
