mod items;
mod sqlite;
