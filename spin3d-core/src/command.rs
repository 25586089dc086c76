/// Text control commands, one per line
///
/// ```text
/// shape <name>
/// scale <float>
/// resolution <uint>
/// color <#rrggbb|#rgb>
/// speed <x|y|z> <float>
/// reset
/// ```
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, multispace0, multispace1, one_of, u32 as uint},
    combinator::{all_consuming, map, value},
    number::complete::double,
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};

use crate::color::{parse_color, Color};
use crate::error::{Error, Result};
use crate::geometry::ShapeFamily;
use crate::transform::Axis;

/// A shape property update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeProperty {
    Scale(f64),
    Resolution(u32),
    Color(Color),
}

impl ShapeProperty {
    /// Build a property update from a name and its textual value
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        let value = value.trim();
        match name {
            "scale" => value
                .parse()
                .map(ShapeProperty::Scale)
                .map_err(|_| Error::Parse(format!("scale {value:?}"))),
            "resolution" => value
                .parse()
                .map(ShapeProperty::Resolution)
                .map_err(|_| Error::Parse(format!("resolution {value:?}"))),
            "color" => value.parse().map(ShapeProperty::Color),
            other => Err(Error::UnknownProperty(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeProperty::Scale(_) => "scale",
            ShapeProperty::Resolution(_) => "resolution",
            ShapeProperty::Color(_) => "color",
        }
    }
}

/// A control-surface action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SelectShape(ShapeFamily),
    SetProperty(ShapeProperty),
    SetRotationSpeed(Axis, f64),
    ResetToDefaults,
}

/// Parse a single command line
pub fn parse_command(input: &str) -> Result<Command> {
    match all_consuming(delimited(multispace0, command, multispace0))(input) {
        Ok((_, cmd)) => Ok(cmd),
        Err(e) => Err(Error::Parse(format!("{input:?}: {e:?}"))),
    }
}

fn command(input: &str) -> IResult<&str, Command> {
    alt((shape, scale, resolution, color, speed, reset))(input)
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), multispace1)
}

fn shape(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("shape"), alpha1), |name: &str| {
        Command::SelectShape(ShapeFamily::from_name_or_default(name))
    })(input)
}

fn scale(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("scale"), double), |v| {
        Command::SetProperty(ShapeProperty::Scale(v))
    })(input)
}

fn resolution(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("resolution"), uint), |v| {
        Command::SetProperty(ShapeProperty::Resolution(v))
    })(input)
}

fn color(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("color"), parse_color), |c| {
        Command::SetProperty(ShapeProperty::Color(c))
    })(input)
}

fn axis(input: &str) -> IResult<&str, Axis> {
    map(one_of("xyzXYZ"), |c| match c.to_ascii_lowercase() {
        'x' => Axis::X,
        'y' => Axis::Y,
        _ => Axis::Z,
    })(input)
}

fn speed(input: &str) -> IResult<&str, Command> {
    map(
        preceded(keyword("speed"), separated_pair(axis, multispace1, double)),
        |(axis, v)| Command::SetRotationSpeed(axis, v),
    )(input)
}

fn reset(input: &str) -> IResult<&str, Command> {
    value(Command::ResetToDefaults, tag("reset"))(input)
}
