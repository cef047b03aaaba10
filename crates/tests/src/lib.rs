
#[cfg(test)]
mod member_tests;
#[cfg(test)]
mod mongo_store_tests;
