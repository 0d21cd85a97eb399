use crate::core::models::chain::Chain;
use crate::core::models::vector::{Vec3, bounding_box};
use std::collections::HashSet;

const CHAIN_LINK_HORIZONTAL: char = '-';
const CHAIN_LINK_VERTICAL: char = '|';
const BOND_MARK: char = '*';

/// Draws the chain as text, one block per z-layer.
///
/// Residues appear as their label on even grid cells. Chain links are drawn
/// with `-` and `|` between consecutive residues, and non-zero bonds between
/// non-consecutive neighbours are marked with `*`. Links that leave a layer are
/// not drawn. Multi-layer folds get a `z = k` header above each layer.
pub fn render_ascii(chain: &Chain) -> String {
    let positions: Vec<Vec3> = chain.residues().iter().map(|r| r.position()).collect();
    let Some((lo, hi)) = bounding_box(positions.iter().copied()) else {
        return String::new();
    };

    let width = (2 * (hi.x - lo.x) + 1) as usize;
    let height = (2 * (hi.y - lo.y) + 1) as usize;
    let bonds: HashSet<(usize, usize)> = chain.bonded_pairs().into_iter().collect();
    let layered = hi.z > lo.z;

    let mut out = String::new();
    for z in (lo.z..=hi.z).rev() {
        let mut grid = vec![vec![' '; width]; height];
        let cell = |p: Vec3| ((2 * (hi.y - p.y)) as usize, (2 * (p.x - lo.x)) as usize);

        let mut mark_between = |a: Vec3, b: Vec3, mark: Option<char>| {
            let (ra, ca) = cell(a);
            let (rb, cb) = cell(b);
            let symbol = mark.unwrap_or(if ra == rb {
                CHAIN_LINK_HORIZONTAL
            } else {
                CHAIN_LINK_VERTICAL
            });
            grid[(ra + rb) / 2][(ca + cb) / 2] = symbol;
        };

        for pair in positions.windows(2) {
            if pair[0].z == z && pair[1].z == z {
                mark_between(pair[0], pair[1], None);
            }
        }
        for &(i, j) in &bonds {
            let (a, b) = (positions[i], positions[j]);
            if a.z == z && b.z == z {
                mark_between(a, b, Some(BOND_MARK));
            }
        }
        for (residue, &p) in chain.residues().iter().zip(&positions) {
            if p.z == z {
                let (r, c) = cell(p);
                grid[r][c] = residue.label().to_char();
            }
        }

        if layered {
            out.push_str(&format!("z = {}\n", z));
        }
        for row in grid {
            let line: String = row.into_iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::direction::Direction::*;

    #[test]
    fn renders_closed_square_with_bond() {
        let mut chain: Chain = "CHHC".parse().unwrap();
        chain.set_order(&[Left, Up, Right]).unwrap();
        assert_eq!(render_ascii(&chain), "H-C\n| *\nH-C\n");
    }

    #[test]
    fn renders_straight_chain_on_one_row() {
        let chain: Chain = "HPH".parse().unwrap();
        assert_eq!(render_ascii(&chain), "H-P-H\n");
    }

    #[test]
    fn renders_each_layer_of_a_three_dimensional_fold() {
        let mut chain: Chain = "HPPH".parse().unwrap();
        chain.set_order(&[Forward, Up, Backward]).unwrap();
        let text = render_ascii(&chain);
        assert_eq!(text, "z = 1\nP\n|\nP\nz = 0\nH\n*\nH\n");
    }
}
