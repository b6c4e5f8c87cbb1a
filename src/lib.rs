pub mod arq;
pub mod chan;
pub mod emu;
pub mod sim;
pub mod trace;

#[cfg(test)]
mod test;
