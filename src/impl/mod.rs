// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod auth_datasource;
        pub(crate) mod card_statement_csv_datasource;
        pub(crate) mod document_datasource;
        pub(crate) mod file_storage_datasource;
        pub(crate) mod transactions_csv_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod document_model;
        pub(crate) mod iso_date_model;
        pub(crate) mod yen_amount_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod auth_repository_impl;
        pub(crate) mod categories_repository_impl;
        pub(crate) mod notifications_repository_impl;
        pub(crate) mod transactions_repository_impl;
        pub(crate) mod users_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod access_scope;
        pub(crate) mod card_statement;
        pub(crate) mod category;
        pub(crate) mod dashboard;
        pub(crate) mod invitation;
        pub(crate) mod notification;
        pub(crate) mod organization;
        pub(crate) mod page;
        pub(crate) mod receipt;
        pub(crate) mod reconciliation;
        pub(crate) mod role_sync;
        pub(crate) mod session;
        pub(crate) mod transaction;
        pub(crate) mod user;
    }
    pub(crate) mod logic {
        pub(crate) mod access_policy;
        pub(crate) mod approval_flow;
        pub(crate) mod paginator;
        pub(crate) mod reconciliation_matcher;
        pub(crate) mod user_filter;
    }
    pub(crate) mod repositories {
        pub(crate) mod auth_repository;
        pub(crate) mod categories_repository;
        pub(crate) mod notifications_repository;
        pub(crate) mod transactions_repository;
        pub(crate) mod users_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod categories_usecase;
        pub(crate) mod dashboard_usecase;
        pub(crate) mod invitation_usecase;
        pub(crate) mod notifications_usecase;
        pub(crate) mod reconciliation_usecase;
        pub(crate) mod roles_usecase;
        pub(crate) mod transactions_usecase;
        pub(crate) mod users_usecase;

        #[cfg(test)]
        pub(crate) mod test_support;
    }
}

pub(crate) mod presentation {
    pub(crate) mod labels;
    pub(crate) mod notification_fmt;
    pub(crate) mod reconciliation_printer;
    pub(crate) mod utils;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::access_scope::*;
        pub use crate::domain::entities::card_statement::*;
        pub use crate::domain::entities::category::*;
        pub use crate::domain::entities::dashboard::*;
        pub use crate::domain::entities::invitation::*;
        pub use crate::domain::entities::notification::*;
        pub use crate::domain::entities::organization::*;
        pub use crate::domain::entities::page::*;
        pub use crate::domain::entities::receipt::*;
        pub use crate::domain::entities::reconciliation::*;
        pub use crate::domain::entities::role_sync::*;
        pub use crate::domain::entities::session::*;
        pub use crate::domain::entities::transaction::*;
        pub use crate::domain::entities::user::*;
    }

    pub mod datasources {
        pub use crate::data::datasources::auth_datasource::{
            AuthDatasource, Claims, MemoryAuthDatasource,
        };
        pub use crate::data::datasources::document_datasource::{
            Document, DocumentDatasource, MemoryDocumentDatasource,
        };
        pub use crate::data::datasources::file_storage_datasource::{
            FileStorageDatasource, LocalFileStorageDatasource,
        };
    }

    pub mod usecases {
        pub use crate::domain::usecases::categories_usecase::CategoriesUsecase;
        pub use crate::domain::usecases::dashboard_usecase::DashboardUsecase;
        pub use crate::domain::usecases::invitation_usecase::InvitationUsecase;
        pub use crate::domain::usecases::notifications_usecase::NotificationsUsecase;
        pub use crate::domain::usecases::reconciliation_usecase::ReconciliationUsecase;
        pub use crate::domain::usecases::roles_usecase::RolesUsecase;
        pub use crate::domain::usecases::transactions_usecase::TransactionsUsecase;
        pub use crate::domain::usecases::users_usecase::UsersUsecase;
    }
}
