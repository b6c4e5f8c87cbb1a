mod support;

mod emulation;
mod receiver;
mod sim_time;
mod timers;
