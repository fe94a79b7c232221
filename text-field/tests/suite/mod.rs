mod construction;
mod race;
