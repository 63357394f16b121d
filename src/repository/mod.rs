pub mod cart_items;
