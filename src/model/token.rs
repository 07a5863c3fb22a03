use std::fmt;
use std::hash::{Hash, Hasher};

/// Table tag for type definitions (high byte of a [`Token`]).
pub const TABLE_TYPE_DEF: u8 = 0x02;
/// Table tag for method definitions (high byte of a [`Token`]).
pub const TABLE_METHOD_DEF: u8 = 0x06;
/// Table tag for event definitions (high byte of a [`Token`]).
pub const TABLE_EVENT: u8 = 0x14;
/// Table tag for property definitions (high byte of a [`Token`]).
pub const TABLE_PROPERTY: u8 = 0x17;

/// A stable identity for a declared member or type, usable as a map key.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the member table (type, method, event, property)
/// - The low 24 bits (bits 0-23) indicate the row index within that table
///
/// Two tokens are equal iff they denote the same declared member. Accessor methods of an
/// event or property carry their own method-table tokens, distinct from the token of the
/// owning event or property.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token in the type-definition table
    #[must_use]
    pub fn type_def(row: u32) -> Self {
        Token::tagged(TABLE_TYPE_DEF, row)
    }

    /// Creates a token in the method-definition table
    #[must_use]
    pub fn method(row: u32) -> Self {
        Token::tagged(TABLE_METHOD_DEF, row)
    }

    /// Creates a token in the event table
    #[must_use]
    pub fn event(row: u32) -> Self {
        Token::tagged(TABLE_EVENT, row)
    }

    /// Creates a token in the property table
    #[must_use]
    pub fn property(row: u32) -> Self {
        Token::tagged(TABLE_PROPERTY, row)
    }

    fn tagged(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table tag from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if this token denotes a method
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.table() == TABLE_METHOD_DEF
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_token_tagged_constructors() {
        assert_eq!(Token::type_def(1).value(), 0x02000001);
        assert_eq!(Token::method(1).value(), 0x06000001);
        assert_eq!(Token::event(3).value(), 0x14000003);
        assert_eq!(Token::property(7).value(), 0x17000007);
    }

    #[test]
    fn test_token_table_and_row() {
        let token = Token::method(42);
        assert_eq!(token.table(), TABLE_METHOD_DEF);
        assert_eq!(token.row(), 42);

        let token2 = Token(0x17FFFFFF);
        assert_eq!(token2.table(), TABLE_PROPERTY);
        assert_eq!(token2.row(), 0x00FFFFFF);
    }

    #[test]
    fn test_token_row_masking() {
        // Rows above 24 bits are truncated, never bleed into the table tag
        let token = Token::method(0x01FF_FFFF);
        assert_eq!(token.table(), TABLE_METHOD_DEF);
        assert_eq!(token.row(), 0x00FF_FFFF);
    }

    #[test]
    fn test_token_is_null() {
        assert!(Token(0).is_null());
        assert!(!Token::method(1).is_null());
    }

    #[test]
    fn test_token_is_method() {
        assert!(Token::method(1).is_method());
        assert!(!Token::event(1).is_method());
        assert!(!Token::property(1).is_method());
    }

    #[test]
    fn test_token_from_conversion() {
        let value = 0x06000001u32;
        let token: Token = value.into();
        assert_eq!(token.value(), value);

        let back_to_u32: u32 = token.into();
        assert_eq!(back_to_u32, value);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(format!("{}", Token::method(1)), "0x06000001");
        assert_eq!(format!("{}", Token(0)), "0x00000000");
    }

    #[test]
    fn test_token_debug() {
        let debug_str = format!("{:?}", Token::method(1));
        assert!(debug_str.contains("Token(0x06000001"));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
    }

    #[test]
    fn test_accessor_tokens_distinct_from_owner() {
        // An event and its add/remove accessors live in different tables
        let event = Token::event(1);
        let on_add = Token::method(10);
        let on_remove = Token::method(11);

        assert_ne!(event, on_add);
        assert_ne!(event, on_remove);
        assert_ne!(on_add, on_remove);
    }

    #[test]
    fn test_token_ordering() {
        let token1 = Token::method(1);
        let token2 = Token::method(2);
        let token3 = Token::property(1);

        assert!(token1 < token2);
        assert!(token2 < token3);
        assert!(token1 < token3);
    }

    #[test]
    fn test_token_hash() {
        let mut map = HashMap::new();
        map.insert(Token::method(1), "Method1");
        map.insert(Token::method(2), "Method2");

        assert_eq!(map.get(&Token::method(1)), Some(&"Method1"));
        assert_eq!(map.get(&Token::method(2)), Some(&"Method2"));
    }
}
