pub(crate) mod pacer;
pub(crate) mod player;
pub(crate) mod stop;
