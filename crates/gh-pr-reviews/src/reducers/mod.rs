pub mod reviews_reducer;
