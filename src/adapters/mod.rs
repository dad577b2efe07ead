pub mod discord;
pub mod storage;
pub mod whatsapp;
