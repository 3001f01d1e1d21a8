pub(crate) mod jq;
pub(crate) mod timezone;

pub(crate) use jq::JqFilter;
pub(crate) use timezone::Timezone;
