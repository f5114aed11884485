mod models;
mod postgres;
mod querier;
mod store;

pub use self::{
    models::{CommentRow, PostDetail, PostListItem, TagInfo},
    postgres::{DBPool, init_db_from_env, migrate},
    querier::Querier,
    store::Store,
};
