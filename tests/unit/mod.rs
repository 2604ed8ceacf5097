/// Unit-level tests against the public library API
mod streak_properties;
mod store_contract;
