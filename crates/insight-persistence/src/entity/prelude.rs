pub use super::insights::Entity as Insights;
pub use super::master_options::Entity as MasterOptions;
pub use super::users::Entity as Users;
