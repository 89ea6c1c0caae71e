//! GLSL ES 1.0 sources for the four fixed passes.

pub const POINT_VS: &str = r#"
attribute vec2 aPosition;
attribute vec3 aColor;
attribute vec3 aOuterRingColor;
attribute lowp float aSize;
attribute lowp float aOpacity;
attribute lowp float aOuterRingOpacity;
attribute lowp float aShape;

uniform mat4 uTransform;
uniform float uPointSizeMin;
uniform float uPointSizeMax;
uniform float uPointSizePow;

varying lowp vec4 vColor;
varying lowp vec4 vOuterRingColor;
varying lowp float vShape;

void main(void) {
  gl_Position = uTransform * vec4(aPosition, 0.0, 1.0);
  float size = clamp(pow(aSize, uPointSizePow), uPointSizeMin, uPointSizeMax);
  gl_PointSize = size * 5.0;
  vColor = vec4(aColor, 1.0) * aOpacity;
  vOuterRingColor = vec4(aOuterRingColor, 1.0) * aOuterRingOpacity;
  vShape = aShape;
}
"#;

pub const POINT_FS: &str = r#"
#extension GL_OES_standard_derivatives : enable
precision mediump float;
varying lowp vec4 vColor;
varying lowp vec4 vOuterRingColor;
varying lowp float vShape;

void main(void) {
  vec4 bkg = vec4(0.0, 0.0, 0.0, 0.0);
  vec2 c = 2.0 / (vShape + 1.0) * gl_PointCoord - 1.0 / (vShape + 1.0);
  float r = dot(c, c);

  float shade = length(c - vec2(-0.5, -0.5));
  vec4 body = mix(vColor, vColor, shade);

  float alpha = 1.0 - smoothstep(0.7, 1.0, r * 2.0);
  vec4 inner = mix(vColor, body, alpha);

  alpha = 1.0 - smoothstep(0.7, 1.0, r * 1.6);
  vec4 ring = mix(vOuterRingColor, inner, alpha);

  alpha = 1.0 - smoothstep(0.7, 1.0, r);
  gl_FragColor = mix(bkg, ring, alpha);
}
"#;

pub const LINE_VS: &str = r#"
attribute vec2 aPosition;
attribute vec3 aColor;
attribute lowp float aOpacity;
uniform mat4 uTransform;
varying lowp vec4 vColor;

void main(void) {
  gl_Position = uTransform * vec4(aPosition, 0.0, 1.0);
  vColor = vec4(aColor, 1.0) * aOpacity;
}
"#;

pub const LINE_FS: &str = r#"
precision mediump float;
varying lowp vec4 vColor;

void main(void) {
  gl_FragColor = vColor;
}
"#;

pub const LASSO_VS: &str = r#"
attribute vec2 aPosition;
uniform mat4 uTransform;

void main(void) {
  gl_Position = uTransform * vec4(aPosition, 0.0, 1.0);
}
"#;

pub const LASSO_FS: &str = r#"
precision mediump float;

void main(void) {
  gl_FragColor = vec4(0.0, 0.0, 1.0, 1.0);
}
"#;

pub const FOCUS_VS: &str = LASSO_VS;

pub const FOCUS_FS: &str = r#"
precision mediump float;

void main(void) {
  gl_FragColor = vec4(0.0, 0.0, 0.8, 1.0);
}
"#;
