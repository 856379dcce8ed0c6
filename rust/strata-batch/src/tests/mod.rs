pub mod fixtures;


#[cfg(test)]
mod lists;

#[cfg(test)]
mod packed_equivalence;
