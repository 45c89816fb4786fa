//! Domain-agnostic multi-objective evolutionary optimization.
//!
//! Provides a generic mu+lambda evolutionary engine and two problems
//! built on it:
//!
//! - **Engine** ([`moea`]): NSGA-II dominance ranking and truncation,
//!   a Pareto archive of every non-dominated solution seen, a constraint
//!   penalty wrapper, and the mu+lambda driver with cooperative
//!   cancellation and optional parallel evaluation.
//! - **Problems** ([`problems`]): a playlist builder balancing ten
//!   musical objectives, and a fixed-menu order problem that searches for
//!   orders close to a target price.
//!
//! # Architecture
//!
//! The engine knows nothing about playlists or menus. A problem plugs in
//! by implementing [`moea::MoeaProblem`]; everything else (ranking,
//! archiving, penalties, the loop itself) is generic over the genome type.
//!
//! # Example
//!
//! ```
//! use u_moea::moea::{MoeaConfig, MoeaRunner};
//! use u_moea::problems::order::{Menu, OrderProblem};
//!
//! let problem = OrderProblem::new(Menu::appetizers(), 15.05);
//! let config = MoeaConfig::small().with_generations(20).with_seed(7);
//! let result = MoeaRunner::run(&problem, &config).unwrap();
//!
//! for member in result.archive.iter() {
//!     assert!(problem.total_price(&member.genome) <= 15.05);
//! }
//! ```

pub mod error;
pub mod moea;
pub mod problems;
pub mod random;
