/*
Duskblade - by David Petnick
*/
pub mod actors;
pub mod ai;
pub mod animation;
pub mod audio;
pub mod camera;
pub mod combat;
pub mod player;
pub mod settings;
pub mod ui;
pub mod world;
