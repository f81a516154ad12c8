//! Unified error codes for dinein
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Menu errors
//! - 4xxx: Upload errors
//! - 5xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the admin frontend can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Email already registered
    EmailExists = 1008,
    /// Too many attempts from this client
    TooManyAttempts = 1009,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Self-registration for this role is not allowed
    RegistrationRestricted = 2004,

    // ==================== 3xxx: Menu ====================
    /// Menu category not found
    CategoryNotFound = 3001,
    /// Category name already used by a live category
    CategoryNameExists = 3002,
    /// Menu item not found
    MenuItemNotFound = 3101,
    /// Menu item price invalid
    MenuItemInvalidPrice = 3102,
    /// Modifier group not found
    ModifierGroupNotFound = 3201,
    /// Modifier option not found
    ModifierOptionNotFound = 3202,
    /// Min selection greater than max selection
    InvalidSelectionRange = 3203,
    /// Photo not found for this item
    PhotoNotFound = 3301,

    // ==================== 4xxx: Upload ====================
    /// File exceeds size limit
    FileTooLarge = 4001,
    /// File extension not accepted
    UnsupportedFileFormat = 4002,
    /// Content is not a decodable image
    InvalidImageFile = 4003,
    /// No file in the multipart body
    NoFileProvided = 4004,
    /// File had no content
    EmptyFile = 4005,
    /// More files than allowed in one request
    TooManyFiles = 4006,
    /// Writing the file to storage failed
    FileStorageFailed = 4007,

    // ==================== 5xxx: Table ====================
    /// Table not found
    TableNotFound = 5001,
    /// Table number already used
    TableNumberExists = 5002,
    /// Table has no QR token yet
    QrTokenMissing = 5003,
    /// QR image/document generation failed
    QrRenderFailed = 5004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Invalid or expired token",
            ErrorCode::AccountDisabled => "Account is inactive",
            ErrorCode::EmailExists => "Email already exists",
            ErrorCode::TooManyAttempts => "Too many requests, try again later",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin role required",
            ErrorCode::RegistrationRestricted => {
                "Registration for admin role is restricted. Please use the pre-configured admin account."
            }

            // Menu
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryNameExists => "Category name already exists",
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Price must be greater than 0",
            ErrorCode::ModifierGroupNotFound => "Group not found",
            ErrorCode::ModifierOptionNotFound => "Option not found",
            ErrorCode::InvalidSelectionRange => {
                "Min selection cannot be greater than Max selection"
            }
            ErrorCode::PhotoNotFound => "Photo not found or does not belong to this item",

            // Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Only image files (jpg, png, webp) are allowed",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "Please select at least one photo",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::TooManyFiles => "Too many files",
            ErrorCode::FileStorageFailed => "Failed to store file",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableNumberExists => "Table number already exists",
            ErrorCode::QrTokenMissing => "Table or QR not found",
            ErrorCode::QrRenderFailed => "Failed to render QR code",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::EmailExists),
            1009 => Ok(ErrorCode::TooManyAttempts),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::RegistrationRestricted),

            // Menu
            3001 => Ok(ErrorCode::CategoryNotFound),
            3002 => Ok(ErrorCode::CategoryNameExists),
            3101 => Ok(ErrorCode::MenuItemNotFound),
            3102 => Ok(ErrorCode::MenuItemInvalidPrice),
            3201 => Ok(ErrorCode::ModifierGroupNotFound),
            3202 => Ok(ErrorCode::ModifierOptionNotFound),
            3203 => Ok(ErrorCode::InvalidSelectionRange),
            3301 => Ok(ErrorCode::PhotoNotFound),

            // Upload
            4001 => Ok(ErrorCode::FileTooLarge),
            4002 => Ok(ErrorCode::UnsupportedFileFormat),
            4003 => Ok(ErrorCode::InvalidImageFile),
            4004 => Ok(ErrorCode::NoFileProvided),
            4005 => Ok(ErrorCode::EmptyFile),
            4006 => Ok(ErrorCode::TooManyFiles),
            4007 => Ok(ErrorCode::FileStorageFailed),

            // Table
            5001 => Ok(ErrorCode::TableNotFound),
            5002 => Ok(ErrorCode::TableNumberExists),
            5003 => Ok(ErrorCode::QrTokenMissing),
            5004 => Ok(ErrorCode::QrRenderFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::CategoryNotFound.code(), 3001);
        assert_eq!(ErrorCode::FileTooLarge.code(), 4001);
        assert_eq!(ErrorCode::TableNotFound.code(), 5001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(5002), Ok(ErrorCode::TableNumberExists));
        assert_eq!(ErrorCode::try_from(3203), Ok(ErrorCode::InvalidSelectionRange));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(6000), Err(InvalidErrorCode(6000)));
        assert_eq!(ErrorCode::try_from(u16::MAX), Err(InvalidErrorCode(u16::MAX)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::TableNotFound).unwrap();
        assert_eq!(json, "5001");

        let json = serde_json::to_string(&ErrorCode::Success).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("42");
        assert!(result.is_err());
    }

    #[test]
    fn test_every_listed_code_roundtrips() {
        let codes = [
            ErrorCode::RequiredField,
            ErrorCode::EmailExists,
            ErrorCode::RegistrationRestricted,
            ErrorCode::PhotoNotFound,
            ErrorCode::TooManyFiles,
            ErrorCode::QrRenderFailed,
            ErrorCode::MenuItemInvalidPrice,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::TableNotFound.message(), "Table not found");
        assert_eq!(
            ErrorCode::InvalidCredentials.message(),
            "Invalid email or password"
        );
    }
}
