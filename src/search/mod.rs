/*!
# String-Search Library

Algorithms over arbitrary 8-bit byte strings (alphabet size 256, no
Unicode-aware matching): exact matchers ([`exact`]), edit distances
([`edit_distance`]), their Sellers fuzzy substring-matching counterparts
([`fuzzy`]), and the road-name lookup wrappers that tie all of the above to
[`crate::core::graph::Road`] selection ([`lookup`]).
*/

pub mod edit_distance;
pub mod exact;
pub mod fuzzy;
pub mod lookup;
