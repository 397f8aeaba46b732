pub mod mirror;
pub mod models;
pub mod session;
pub mod storage;

mod file_store;
mod memory;
pub use file_store::FileStorage;
pub use memory::MemoryStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorage;

pub use mirror::{MirrorStore, Record};
pub use models::{
    Category, CategoryInfo, Credentials, NewPetition, NewSupport, NewSupportTier, NewUser,
    Petition, PetitionPatch, SupportTier, SupportTierPatch, Supporter, User, UserPatch,
};
pub use session::{SessionRecord, SessionStore};
pub use storage::{DurableStorage, StoreError};
