pub mod rolls;
