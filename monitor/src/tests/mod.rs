mod automaton;
mod fixture;
mod predicate;
mod runner;
mod stream;
