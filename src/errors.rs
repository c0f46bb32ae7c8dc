use fractic_server_error::{define_client_error, define_internal_error};

// IO-related.
define_client_error!(ReadError, "Error reading file.");
define_internal_error!(WriteError, "Error writing file '{path}'.", { path: &str });
define_client_error!(
    InvalidStoragePath,
    "Invalid storage path: '{path}'.",
    { path: &str }
);

// Parsing-related.
define_client_error!(InvalidCsv, "Invalid CSV format.");
define_client_error!(InvalidCsvContent, "Invalid CSV content: {details}.", { details: &str });
define_client_error!(InvalidRon, "Invalid {ron_type} (invalid RON format).", { ron_type: &str });
define_client_error!(InvalidIsoDate, "Invalid date: {date}.", { date: &str });
define_client_error!(InvalidYenAmount, "Invalid yen amount: '{value}'.", { value: &str });
define_client_error!(InvalidBase64, "Invalid base64 content for '{file_name}'.", { file_name: &str });
define_client_error!(InvalidRole, "Invalid role: '{role}'.", { role: &str });

// Storage-related.
define_internal_error!(
    DocumentEncodeError,
    "Could not encode document for collection '{collection}'.",
    { collection: &str }
);
define_internal_error!(
    DocumentDecodeError,
    "Could not decode document '{id}' in collection '{collection}'.",
    { collection: &str, id: &str }
);

// Lookup-related.
define_client_error!(UserNotFound, "User '{uid}' not found.", { uid: &str });
define_client_error!(TransactionNotFound, "Transaction '{id}' not found.", { id: &str });
define_client_error!(NotificationNotFound, "Notification '{id}' not found.", { id: &str });
define_client_error!(CategoryNotFound, "Category '{id}' not found.", { id: &str });

// Access-related.
define_client_error!(AuthenticationFailed, "Sign-in failed. Check the email address and password.");
define_client_error!(
    PermissionDenied,
    "Not permitted to {action}.",
    { action: &str }
);
define_client_error!(CannotDeleteSelf, "Users cannot delete their own account.");
define_client_error!(AdminAlreadyExists, "An administrator account already exists.");
define_client_error!(MissingUidOrRole, "uid and role are required.");

// Validation-related.
define_client_error!(MissingRequiredField, "Missing required field: {field}.", { field: &str });
define_client_error!(
    NonPositiveAmount,
    "Amount must be greater than zero (got {amount}).",
    { amount: f64 }
);
define_client_error!(
    InvalidStatusTransition,
    "Cannot {action} a transaction in status '{status}'.",
    { action: &str, status: &str }
);
define_client_error!(
    ApprovedTransactionImmutable,
    "Transaction '{id}' is approved and can no longer be edited.",
    { id: &str }
);
define_client_error!(
    InvalidOrganizationPlacement,
    "Invalid organization placement: {details}.",
    { details: &str }
);

// Reconciliation-related.
define_client_error!(EmptyCardStatement, "The card statement contains no usable rows.");

// Invitation / account-related.
define_client_error!(InvalidEmail, "Invalid email address: '{email}'.", { email: &str });
define_client_error!(
    EmailAlreadyRegistered,
    "The email address '{email}' is already registered.",
    { email: &str }
);
define_client_error!(InviteInvalid, "The invitation link is invalid.");
define_client_error!(InviteExpired, "The invitation link has expired.");
define_client_error!(
    PasswordTooShort,
    "Password must be at least {min} characters long.",
    { min: usize }
);
define_client_error!(PasswordMismatch, "Passwords do not match.");
define_client_error!(
    AccountAlreadyExists,
    "An account for '{email}' already exists.",
    { email: &str }
);
