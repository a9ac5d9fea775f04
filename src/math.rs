/// Multiplies a 3x3 matrix by a 3-dimensional vector
pub fn multiply_matrix_vector(matrix: &[[f64; 3]; 3], vector: &[f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            result[i] += matrix[i][j] * vector[j];
        }
    }
    result
}

/// Multiplies two 3x3 matrices
pub fn multiply_matrices(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut result = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Rotation around the X-axis
pub fn rotation_x(angle: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = angle.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]]
}

/// Rotation around the Y-axis
pub fn rotation_y(angle: f64) -> [[f64; 3]; 3] {
    let (sin, cos) = angle.sin_cos();
    [[cos, 0.0, sin], [0.0, 1.0, 0.0], [-sin, 0.0, cos]]
}

/// Combined group rotation: X first, then Y
pub fn group_rotation(angle_x: f64, angle_y: f64) -> [[f64; 3]; 3] {
    multiply_matrices(&rotation_y(angle_y), &rotation_x(angle_x))
}

/// Squared Euclidean distance between two points
pub fn distance_squared(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let d = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    d[0] * d[0] + d[1] * d[1] + d[2] * d[2]
}

/// Euclidean distance between two points
pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    distance_squared(a, b).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn quarter_turn_around_y_maps_x_to_minus_z() {
        let rotated = multiply_matrix_vector(&rotation_y(FRAC_PI_2), &[1.0, 0.0, 0.0]);
        assert!(close(rotated, [0.0, 0.0, -1.0]));
    }

    #[test]
    fn group_rotation_applies_x_before_y() {
        // X quarter turn sends +y to +z, Y quarter turn then sends +z to +x
        let m = group_rotation(FRAC_PI_2, FRAC_PI_2);
        let rotated = multiply_matrix_vector(&m, &[0.0, 1.0, 0.0]);
        assert!(close(rotated, [1.0, 0.0, 0.0]));
    }

    #[test]
    fn rotation_preserves_distance() {
        let m = group_rotation(0.3, 1.7);
        let a = [1.0, -2.0, 0.5];
        let b = [-0.25, 4.0, 3.0];
        let before = distance(&a, &b);
        let after = distance(&multiply_matrix_vector(&m, &a), &multiply_matrix_vector(&m, &b));
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn distance_of_axis_offsets() {
        assert_eq!(distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]), 5.0);
        assert_eq!(distance_squared(&[1.0, 1.0, 1.0], &[1.0, 1.0, 3.0]), 4.0);
    }
}
