use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::event::Notification;
use crate::square::Square;
use crate::tour::Tour;

fn parse_square<E: serde::de::Error>(s: &str) -> Result<Square, E> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| E::custom(format!("Invalid square format: {}", s)))?;
    let x: u8 = x
        .trim()
        .parse()
        .map_err(|e| E::custom(format!("Invalid x: {}", e)))?;
    let y: u8 = y
        .trim()
        .parse()
        .map_err(|e| E::custom(format!("Invalid y: {}", e)))?;
    Ok(Square::new(x, y))
}

impl Serialize for Square {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{},{}", self.x, self.y))
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_square(&s)
    }
}

/// `"NxN:x,y;x,y;..."` in visit order.
impl Serialize for Tour {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let squares: Vec<String> = self
            .squares()
            .iter()
            .map(|s| format!("{},{}", s.x, s.y))
            .collect();
        let n = self.board_size();
        serializer.serialize_str(&format!("{}x{}:{}", n, n, squares.join(";")))
    }
}

impl<'de> Deserialize<'de> for Tour {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (dims, rest) = s
            .split_once(':')
            .ok_or_else(|| serde::de::Error::custom("Missing board dimensions"))?;
        let (w, h) = dims
            .split_once('x')
            .ok_or_else(|| serde::de::Error::custom("Invalid dimensions format"))?;
        let width: usize = w
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("Invalid width: {}", e)))?;
        let height: usize = h
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("Invalid height: {}", e)))?;
        if width != height {
            return Err(serde::de::Error::custom(format!(
                "Board must be square, got {}x{}",
                width, height
            )));
        }

        let squares = rest
            .split(';')
            .map(|part| parse_square(part.trim()))
            .collect::<Result<Vec<Square>, D::Error>>()?;

        Tour::from_squares(width, squares).map_err(serde::de::Error::custom)
    }
}

/// `"step:i:x,y"` or `"backtrack:x,y"`.
impl Serialize for Notification {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Notification::Step { step_index, square } => serializer.serialize_str(&format!(
                "step:{}:{},{}",
                step_index, square.x, square.y
            )),
            Notification::Backtrack { square } => {
                serializer.serialize_str(&format!("backtrack:{},{}", square.x, square.y))
            }
        }
    }
}

impl<'de> Deserialize<'de> for Notification {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        if let Some(rest) = s.strip_prefix("backtrack:") {
            return Ok(Notification::backtrack(parse_square(rest)?));
        }

        let rest = s.strip_prefix("step:").ok_or_else(|| {
            serde::de::Error::custom(format!("Invalid notification format: {}", s))
        })?;
        let (index, square) = rest
            .split_once(':')
            .ok_or_else(|| serde::de::Error::custom(format!("Missing step index: {}", s)))?;
        let step_index: usize = index
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("Invalid step index: {}", e)))?;

        Ok(Notification::step(step_index, parse_square(square)?))
    }
}
